//! Blue Sky watch face firmware
//! ========================================
//! needs to be run in WSL2 terminal
//! source ~/export-esp.sh
//! cargo run --release --features esp32s3-disp143Oled
//! ========================================
//!
//! Seeds the clock from the PCF85063, then shows the 24-hour analog face
//! full screen and repaints it whenever the minute changes.

//% CHIPS: esp32s3
//% FEATURES: esp-hal/unstable

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
// The macro automatically fills in the fields.
esp_bootloader_esp_idf::esp_app_desc!();

use bluesky_face::{
    co5300::{CO5300_WIDTH, DMA_CHUNK},
    display::setup_display,
    rtc_pcf85063::Pcf85063,
    wiring::{init_board_pins, BoardPins},
    AnalogFaceLayer, FixedOffset,
};

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle};
use esp_backtrace as _;
use esp_hal::{
    delay::Delay,
    i2c::master::{Config as I2cConfig, I2c},
    main, psram,
    time::{Instant, Rate},
    Config,
};
use esp_println::println;

// Allocator for PSRAM
extern crate alloc;
use alloc::{boxed::Box, vec};

// Local zone; the RTC keeps UTC.
const UTC_OFFSET_SECS: i32 = 0;
const POLL_MS: u32 = 250;

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());

    esp_alloc::psram_allocator!(&peripherals.PSRAM, psram);

    esp_println::logger::init_logger(log::LevelFilter::Debug);

    let BoardPins {
        display_pins,
        rtc_pins,
    } = init_board_pins(peripherals);

    // -------------------- RTC --------------------
    let cfg = I2cConfig::default().with_frequency(Rate::from_khz(400));
    let boot_secs: i64 = match I2c::new(rtc_pins.i2c0, cfg) {
        Ok(i2c) => {
            let i2c = i2c.with_sda(rtc_pins.sda).with_scl(rtc_pins.scl);
            let mut rtc = Pcf85063::new(i2c);
            match rtc.read_unix() {
                Ok(Some(secs)) => {
                    println!("[RTC] read ok, unix {}", secs);
                    secs
                }
                Ok(None) => {
                    println!("[RTC] clock lost power, starting at epoch");
                    0
                }
                Err(e) => {
                    println!("[RTC] read failed: {:?}", e);
                    0
                }
            }
        }
        Err(e) => {
            println!("I2C init failed: {:?}", e);
            0
        }
    };

    // -------------------- Display --------------------
    const W: usize = CO5300_WIDTH as usize;
    let fb: &'static mut [u16] = Box::leak(vec![0u16; W * W].into_boxed_slice());
    let bounce: &'static mut [u8] = Box::leak(vec![0u8; DMA_CHUNK].into_boxed_slice());
    let mut display = setup_display(display_pins, fb, bounce);

    let frame = Rectangle::new(Point::zero(), display.size());
    let zone = FixedOffset::east_opt(UTC_OFFSET_SECS).expect("offset within one day");
    let mut face = AnalogFaceLayer::create(frame, zone).expect("panel has a drawable area");

    // -------------------- Main loop --------------------
    let delay = Delay::new();
    let boot = Instant::now();
    let mut shown_minute = i64::MIN;

    loop {
        let now = boot_secs + boot.elapsed().as_secs() as i64;
        if now.div_euclid(60) != shown_minute {
            shown_minute = now.div_euclid(60);
            face.set_time(now);
        }

        // The face paints over a transparent background; wipe the last sun.
        if face.layer().is_dirty() {
            display.clear(Rgb565::BLACK).ok();
            face.render(&mut display).ok();
            if let Err(e) = display.flush() {
                println!("display flush failed: {:?}", e);
            }
        }

        delay.delay_millis(POLL_MS);
    }
}
