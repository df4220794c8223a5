// Minimal CO5300 AMOLED driver (Standard SPI mode, no D/C pin).
// Works with esp-hal (no_std) and embedded-graphics.
//
// Wiring on Waveshare ESP32-S3 Touch AMOLED 1.43" (CO5300):
//   CS  = GPIO9
//   SCK = GPIO10
//   IO0/MOSI = GPIO11
//   (IO1..IO3 unused in Standard SPI mode)
//   RST = GPIO21
//
// Protocol (Standard SPI):
//   Every write begins with [0x02, 0x00, CMD, 0x00], then N data bytes.
// Geometry: panel is 466 x 466 logical pixels (square), columns offset by 6.
//
// Drawing only touches the local framebuffer and grows a dirty rectangle.
// `flush` sends that rectangle in one RAMWR burst, so a whole face redraw
// costs a single transfer.

use core::convert::Infallible;
use core::sync::atomic::{compiler_fence, Ordering};

use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::Rectangle, Pixel};
use embedded_hal::{
    delay::DelayNs,
    digital::OutputPin,
    spi::{Operation, SpiDevice},
};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use esp_hal::{gpio::Output, spi::master::SpiDmaBus, Blocking};

pub const CO5300_WIDTH: u16 = 466;
pub const CO5300_HEIGHT: u16 = 466;
const X_OFFSET: u16 = 0x0006;
const Y_OFFSET: u16 = 0x0000;

// 32736 = 32 * 1023
pub const DMA_CHUNK: usize = 32 * 1023;

const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;
const RAMWRC: u8 = 0x3C;
const WRDISBV: u8 = 0x51;
const WRCTRLD: u8 = 0x53;

/// Error type that wraps SPI and GPIO errors.
#[derive(Debug)]
pub enum Co5300Error<SpiE, GpioE> {
    Spi(SpiE),
    Gpio(GpioE),
    OutOfBounds,
}

// Inclusive pixel bounds of what changed since the last flush.
#[derive(Copy, Clone, Debug)]
struct Dirty {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

impl Dirty {
    fn grow(this: &mut Option<Dirty>, x0: u16, y0: u16, x1: u16, y1: u16) {
        *this = Some(match *this {
            None => Dirty { x0, y0, x1, y1 },
            Some(d) => Dirty {
                x0: d.x0.min(x0),
                y0: d.y0.min(y0),
                x1: d.x1.max(x1),
                y1: d.y1.max(y1),
            },
        });
    }
}

pub struct Co5300Display<'fb, SPI, RST> {
    spi: SPI,
    rst: Option<RST>,
    w: u16,
    h: u16,
    fb: &'fb mut [u16],
    bounce: &'fb mut [u8],
    dirty: Option<Dirty>,
}

impl<'fb, SPI, RST> Co5300Display<'fb, SPI, RST>
where
    // embedded-hal 1.0 `SpiDevice<u8>` so we can do atomic CS-asserted transfers.
    SPI: SpiDevice<u8>,
    RST: OutputPin,
{
    /// Create + init the panel. Call once at startup.
    ///
    /// * `fb` - `width * height` RGB565 pixels
    /// * `bounce` - staging buffer for SPI bursts, any even length
    pub fn new(
        spi: SPI,
        rst: Option<RST>,
        delay: &mut impl DelayNs,
        width: u16,
        height: u16,
        fb: &'fb mut [u16],
        bounce: &'fb mut [u8],
    ) -> Result<Self, Co5300Error<SPI::Error, RST::Error>> {
        if fb.len() != (width as usize) * (height as usize) || bounce.len() < 2 {
            return Err(Co5300Error::OutOfBounds);
        }

        let mut this = Self {
            spi,
            rst,
            w: width,
            h: height,
            fb,
            bounce,
            dirty: None,
        };

        // Hard reset sequence
        if let Some(r) = this.rst.as_mut() {
            r.set_high().map_err(Co5300Error::Gpio)?;
            delay.delay_ms(2);
            r.set_low().map_err(Co5300Error::Gpio)?;
            delay.delay_ms(80);
            r.set_high().map_err(Co5300Error::Gpio)?;
            delay.delay_ms(200);
        }

        this.cmd(SWRESET, &[])?;
        delay.delay_ms(150);
        this.cmd(SLPOUT, &[])?;
        delay.delay_ms(180);

        this.cmd(COLMOD, &[0x55])?; // RGB565
        delay.delay_ms(2);
        this.cmd(0xC4, &[0x80])?; // SPI mode control
        this.cmd(NORON, &[])?;
        this.cmd(WRCTRLD, &[0x20])?;
        delay.delay_ms(1);
        this.cmd(0x63, &[0xFF])?; // vendor HBM enable
        delay.delay_ms(1);

        // Panel up dark, then to full brightness once it is on.
        this.cmd(WRDISBV, &[0x00])?;
        delay.delay_ms(1);
        this.cmd(DISPON, &[])?;
        delay.delay_ms(200);
        this.cmd(WRDISBV, &[0xFF])?;
        this.cmd(MADCTL, &[0x00])?;

        this.set_window(0, 0, width - 1, height - 1)?;
        this.fb.fill(0);
        Ok(this)
    }

    pub fn set_brightness(&mut self, level: u8) -> Result<(), Co5300Error<SPI::Error, RST::Error>> {
        self.cmd(WRDISBV, &[level])
    }

    /// Sends everything drawn since the last flush.
    pub fn flush(&mut self) -> Result<(), Co5300Error<SPI::Error, RST::Error>> {
        let Some(d) = self.dirty.take() else {
            return Ok(());
        };

        // The panel wants even-aligned windows (2x2 tiles).
        let x0 = d.x0 & !1;
        let y0 = d.y0 & !1;
        let x1 = (d.x1 | 1).min(self.w - 1);
        let y1 = (d.y1 | 1).min(self.h - 1);
        self.set_window(x0, y0, x1, y1)?;

        let fbw = self.w as usize;
        let cap = self.bounce.len() & !1;
        let mut first = true;
        let mut filled = 0usize;

        for y in y0..=y1 {
            let row = (y as usize) * fbw;
            for x in x0..=x1 {
                if filled + 2 > cap {
                    self.send_burst(&mut first, filled)?;
                    filled = 0;
                }
                let be = self.fb[row + x as usize].to_be_bytes();
                self.bounce[filled] = be[0];
                self.bounce[filled + 1] = be[1];
                filled += 2;
            }
        }
        self.send_burst(&mut first, filled)
    }

    // First burst opens the window with RAMWR, later ones continue with RAMWRC.
    fn send_burst(
        &mut self,
        first: &mut bool,
        len: usize,
    ) -> Result<(), Co5300Error<SPI::Error, RST::Error>> {
        if len == 0 {
            return Ok(());
        }
        let opcode = if *first { RAMWR } else { RAMWRC };
        *first = false;
        let hdr: [u8; 4] = [0x02, 0x00, opcode, 0x00];

        compiler_fence(Ordering::Release);
        let mut ops: heapless::Vec<Operation<'_, u8>, 2> = heapless::Vec::new();
        ops.push(Operation::Write(&hdr)).ok();
        ops.push(Operation::Write(&self.bounce[..len])).ok();
        let result = self.spi.transaction(&mut ops).map_err(Co5300Error::Spi);
        compiler_fence(Ordering::Acquire);
        result
    }

    // Column/row address window, panel offsets applied.
    fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), Co5300Error<SPI::Error, RST::Error>> {
        if x0 > x1 || y0 > y1 || x1 >= self.w || y1 >= self.h {
            return Err(Co5300Error::OutOfBounds);
        }
        let (x0, x1) = (x0 + X_OFFSET, x1 + X_OFFSET);
        let (y0, y1) = (y0 + Y_OFFSET, y1 + Y_OFFSET);
        let ca = [(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8];
        let ra = [(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8];
        self.cmd(CASET, &ca)?;
        self.cmd(RASET, &ra)
    }

    fn cmd(&mut self, cmd: u8, data: &[u8]) -> Result<(), Co5300Error<SPI::Error, RST::Error>> {
        let hdr: [u8; 4] = [0x02, 0x00, cmd, 0x00];
        if data.is_empty() {
            self.spi.write(&hdr).map_err(Co5300Error::Spi)
        } else {
            self.spi
                .transaction(&mut [Operation::Write(&hdr), Operation::Write(data)])
                .map_err(Co5300Error::Spi)
        }
    }
}

// -------------------- embedded-graphics integration --------------------
impl<SPI, RST> OriginDimensions for Co5300Display<'_, SPI, RST> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<SPI, RST> DrawTarget for Co5300Display<'_, SPI, RST> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if p.x < 0 || p.y < 0 {
                continue;
            }
            let (x, y) = (p.x as u16, p.y as u16);
            if x >= self.w || y >= self.h {
                continue;
            }
            self.fb[(y as usize) * (self.w as usize) + (x as usize)] = c.into_storage();
            Dirty::grow(&mut self.dirty, x, y, x, y);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(br) = area.bottom_right() else {
            return Ok(());
        };
        let (x0, y0) = (area.top_left.x as u16, area.top_left.y as u16);
        let (x1, y1) = (br.x as u16, br.y as u16);
        let raw = color.into_storage();
        let fbw = self.w as usize;
        for y in y0..=y1 {
            let base = (y as usize) * fbw;
            self.fb[base + x0 as usize..=base + x1 as usize].fill(raw);
        }
        Dirty::grow(&mut self.dirty, x0, y0, x1, y1);
        Ok(())
    }
}

/// Initializes the panel at its native size.
pub fn new_with_defaults<'fb, SPI, RST>(
    spi: SPI,
    rst: Option<RST>,
    delay: &mut impl DelayNs,
    fb: &'fb mut [u16],
    bounce: &'fb mut [u8],
) -> Result<Co5300Display<'fb, SPI, RST>, Co5300Error<SPI::Error, RST::Error>>
where
    SPI: SpiDevice<u8>,
    RST: OutputPin,
{
    Co5300Display::new(spi, rst, delay, CO5300_WIDTH, CO5300_HEIGHT, fb, bounce)
}

// SPI2 on DMA channel 0, CS on a GPIO, no inter-transfer delay.
pub type SpiDev<'a> = ExclusiveDevice<SpiDmaBus<'a, Blocking>, Output<'a>, NoDelay>;

pub type DisplayType<'a> = Co5300Display<'a, SpiDev<'a>, Output<'a>>;
