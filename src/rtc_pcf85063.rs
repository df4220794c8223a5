// RTC driver for PCF85063A/PCF85063TP real-time clock chips.
// Datasheet: https://files.waveshare.com/wiki/common/Pcf85063atl1118-NdPQpTGE-loeW7GbZ7.pdf
//
// The chip keeps UTC; the face converts to local time through its TimeZone.

use embedded_hal::i2c::I2c;

use crate::clock::{utc_instant, WallTime};

pub const ADDRESS: u8 = 0x51;
// Time registers start at 0x04: sec, min, hour, day, weekday, month, year
const REG_SECONDS: u8 = 0x04;

pub struct Pcf85063<I2C> {
    i2c: I2C,
}

impl<I2C, E> Pcf85063<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }

    // Read datetime. Returns (dt, os_flag) where os_flag == true means time is unreliable (power loss).
    pub fn read_datetime(&mut self) -> Result<(WallTime, bool), E> {
        let mut buf = [0u8; 7];
        self.i2c.write_read(ADDRESS, &[REG_SECONDS], &mut buf)?;
        let os = (buf[0] & 0x80) != 0;
        let month_raw = buf[5];
        let year = if (month_raw & 0x80) != 0 {
            1900 + bcd_decode(buf[6]) as i32
        } else {
            2000 + bcd_decode(buf[6]) as i32
        };
        let raw = WallTime {
            year,
            month: bcd_decode(month_raw & 0x1F),
            day: bcd_decode(buf[3] & 0x3F),
            hour: bcd_decode(buf[2] & 0x3F),
            minute: bcd_decode(buf[1] & 0x7F),
            second: bcd_decode(buf[0] & 0x7F),
            ..WallTime::default()
        };
        if !datetime_is_valid(&raw) {
            return Ok((raw, true));
        }
        // Recompute weekday/yearday instead of trusting the chip's counter.
        match raw.to_naive() {
            Some(dt) => Ok((WallTime::from_datetime(&dt), os)),
            None => Ok((raw, true)),
        }
    }

    // Set datetime from seconds since the epoch (UTC).
    pub fn set_unix(&mut self, unix_time: i64) -> Result<(), E> {
        let dt = WallTime::from_datetime(&utc_instant(unix_time));
        let yr = dt.year.rem_euclid(100) as u8;
        let data = [
            REG_SECONDS,
            bcd_encode(dt.second),
            bcd_encode(dt.minute),
            bcd_encode(dt.hour),
            bcd_encode(dt.day),
            dt.weekday,
            bcd_encode(dt.month),
            bcd_encode(yr),
        ];
        self.i2c.write(ADDRESS, &data)
    }

    // Seconds since the epoch, or None when the chip lost power or holds garbage.
    pub fn read_unix(&mut self) -> Result<Option<i64>, E> {
        let (dt, os) = self.read_datetime()?;
        Ok(if os { None } else { dt.utc_timestamp() })
    }
}

// BCD decode
fn bcd_decode(v: u8) -> u8 {
    (v & 0x0F) + ((v >> 4) * 10)
}

// BCD encode
fn bcd_encode(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

// Basic sanity check on decoded RTC time.
pub fn datetime_is_valid(dt: &WallTime) -> bool {
    (2020..=2099).contains(&dt.year)
        && (1..=12).contains(&dt.month)
        && (1..=31).contains(&dt.day)
        && dt.hour < 24
        && dt.minute < 60
        && dt.second < 60
}
