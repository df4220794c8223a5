// Board pin mapping for the Waveshare ESP32-S3 Touch AMOLED 1.43".
//! The following wiring is assumed:
//! - AMOLED CS   => GPIO9
//! - AMOLED SCK  => GPIO10
//! - AMOLED IO0  => GPIO11 (MOSI, Standard SPI mode)
//! - AMOLED RST  => GPIO21
//! - AMOLED EN   => GPIO42 (panel power rail)
//! - I2C SDA     => GPIO47 (shared by RTC, IMU and touch)
//! - I2C SCL     => GPIO48
//! - PCF85063 RTC at 0x51

use esp_hal::{
    gpio::{Level, Output, OutputConfig},
    peripherals::{Peripherals, DMA_CH0, GPIO10, GPIO11, GPIO47, GPIO48, I2C0, SPI2},
};

pub struct DisplayPins<'a> {
    pub spi2: SPI2<'a>,
    pub cs: Output<'a>,
    pub clk: GPIO10<'a>,
    pub do0: GPIO11<'a>,
    pub rst: Output<'a>,
    pub en: Output<'a>,
    pub dma_ch0: DMA_CH0<'a>,
}

pub struct RtcPins<'a> {
    pub i2c0: I2C0<'a>,
    pub sda: GPIO47<'a>,
    pub scl: GPIO48<'a>,
}

pub struct BoardPins<'a> {
    pub display_pins: DisplayPins<'a>,
    pub rtc_pins: RtcPins<'a>,
}

pub fn init_board_pins(p: Peripherals) -> BoardPins<'static> {
    // CS idles high, RST held released; GPIO10/11 stay raw for the SPI driver
    let cs = Output::new(p.GPIO9, Level::High, OutputConfig::default());
    let rst = Output::new(p.GPIO21, Level::High, OutputConfig::default());
    let en = Output::new(p.GPIO42, Level::Low, OutputConfig::default());

    BoardPins {
        display_pins: DisplayPins {
            spi2: p.SPI2,
            cs,
            clk: p.GPIO10,
            do0: p.GPIO11,
            rst,
            en,
            dma_ch0: p.DMA_CH0,
        },
        rtc_pins: RtcPins {
            i2c0: p.I2C0,
            sda: p.GPIO47,
            scl: p.GPIO48,
        },
    }
}
