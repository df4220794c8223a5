//! Display setup and initialization module.
//
// - `setup_display` brings up the CO5300 (466x466, no D/C, 0x02 framing)
//   on SPI2 with DMA and hands back a draw target for the face.
// - Pins come from `wiring::DisplayPins`.

use esp_backtrace as _;

use embedded_hal::delay::DelayNs;
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::{
    delay::Delay,
    dma::{DmaRxBuf, DmaTxBuf},
    dma_buffers,
    spi::{
        master::{Config, Spi, SpiDmaBus},
        Mode,
    },
    time::Rate,
    Blocking,
};

use crate::co5300;
pub use crate::co5300::DisplayType;
use crate::wiring::DisplayPins;

pub fn setup_display(
    display_pins: DisplayPins<'static>,
    fb: &'static mut [u16],
    bounce: &'static mut [u8],
) -> DisplayType<'static> {
    let DisplayPins {
        spi2,
        cs,
        clk,
        do0,
        rst,
        mut en,
        dma_ch0,
    } = display_pins;

    let mut delay = Delay::new();

    // Power cycle the panel rail
    en.set_low();
    delay.delay_ms(10);
    en.set_high();
    delay.delay_ms(100);

    // SPI @ 40 MHz, Mode 0 is the known stable setting
    let spi = Spi::new(
        spi2,
        Config::default()
            .with_frequency(Rate::from_mhz(40))
            .with_mode(Mode::_0),
    )
    .expect("SPI2 config rejected")
    .with_sck(clk)
    .with_mosi(do0)
    .with_dma(dma_ch0);

    let (rx_buf, rx_desc, tx_buf, tx_desc) = dma_buffers!(4096, 32736);
    let rx = DmaRxBuf::new(rx_desc, rx_buf).expect("DMA rx buffer");
    let tx = DmaTxBuf::new(tx_desc, tx_buf).expect("DMA tx buffer");

    let spi_bus: SpiDmaBus<'_, Blocking> = spi.with_buffers(rx, tx);
    let spi_dev = ExclusiveDevice::new(spi_bus, cs, NoDelay).expect("CS pin");

    co5300::new_with_defaults(spi_dev, Some(rst), &mut delay, fb, bounce)
        .expect("CO5300 init failed")
}
