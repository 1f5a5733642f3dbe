//! UART receive task
//!
//! Copies each burst of DMA-received bytes into the receive ring and wakes
//! the console.

use defmt::*;

use serialmux_hal::uart::DmaRx;
use serialmux_protocol::DmaWindow;

use crate::channels::{DATA_READY, RX_RING};
use crate::hw::IdleDmaRx;

#[embassy_executor::task]
pub async fn rx_task(mut rx: IdleDmaRx) {
    info!("RX task started ({} byte DMA buffer)", rx.buffer().len());

    let mut window = DmaWindow::new(rx.buffer().len());

    loop {
        match rx.receive().await {
            Ok(n) => {
                trace!("RX: {} bytes", n);

                let extraction = window.poll(&rx, &RX_RING);
                if extraction.dropped > 0 {
                    warn!(
                        "RX ring full: dropped {} bytes ({} total)",
                        extraction.dropped,
                        window.dropped()
                    );
                }
                if extraction.pushed > 0 {
                    DATA_READY.signal(());
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                if let Err(e) = window.recover(&mut rx) {
                    error!("UART restart failed: {:?}", e);
                }
            }
        }
    }
}
