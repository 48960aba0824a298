use embassy_futures::select::select3;
use embassy_rp::gpio::Input;
use sensor_emulator::control::RelayReport;

use crate::signals::RELAY_SIGNAL;

/// Watch the fan, heat and cool outputs and signal their state on every change.
#[embassy_executor::task]
pub(crate) async fn relays(
    mut fan: Input<'static>,
    mut heat: Input<'static>,
    mut cool: Input<'static>,
) -> ! {
    loop {
        let report = RelayReport::from_levels([fan.is_high(), heat.is_high(), cool.is_high()]);
        defmt::debug!("Relays: {}", report);
        RELAY_SIGNAL.signal(report);
        select3(
            fan.wait_for_any_edge(),
            heat.wait_for_any_edge(),
            cool.wait_for_any_edge(),
        )
        .await;
    }
}
