use std::fmt;

/// Bus location of the sensor. Handed to the reader unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorOptions {
    pub i2c_bus_no: Option<u8>,

    pub i2c_address: Option<u16>,
}

impl fmt::Display for SensorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.i2c_bus_no {
            Some(bus) => write!(f, "i2cBusNo={bus}")?,
            None => write!(f, "i2cBusNo=default")?,
        }
        match self.i2c_address {
            Some(address) => write!(f, " i2cAddress=0x{address:02x}"),
            None => write!(f, " i2cAddress=default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_defaults() {
        assert_eq!(
            SensorOptions::default().to_string(),
            "i2cBusNo=default i2cAddress=default"
        );
    }

    #[test]
    fn display_explicit_address_as_hex() {
        let options = SensorOptions {
            i2c_bus_no: Some(1),
            i2c_address: Some(0x77),
        };
        assert_eq!(options.to_string(), "i2cBusNo=1 i2cAddress=0x77");
    }
}
