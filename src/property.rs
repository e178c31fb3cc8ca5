//! The static Flexit Nordic property catalogue.
//!
//! Mirrors `flexit_bacnet/nordic.py` from the original implementation: every
//! entry there becomes a [`PropertyDescriptor`] here, with named constants for
//! the property's valid enumeration codes replacing the dynamic attributes
//! the Python source attached to each descriptor instance.

use crate::object::{ObjectIdentifier, ObjectType, PropertyId};
use crate::value::WriteKind;

/// An immutable descriptor naming one BACnet object and the properties to
/// read from (or, for writes, the single property to write to) it.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    pub object_type: ObjectType,
    pub instance_id: u32,
    /// Property ids read by `ReadPropertyMultiple`, in request order.
    pub read_values: &'static [PropertyId],
    /// Command priority (1..16) used when writing. `None` for properties
    /// this library never writes.
    pub priority: Option<u8>,
}

impl PropertyDescriptor {
    pub const fn new(object_type: ObjectType, instance_id: u32) -> Self {
        Self {
            object_type,
            instance_id,
            read_values: &[PropertyId::PresentValue],
            priority: None,
        }
    }

    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub const fn with_read_values(mut self, read_values: &'static [PropertyId]) -> Self {
        self.read_values = read_values;
        self
    }

    pub fn object_identifier(&self) -> ObjectIdentifier {
        ObjectIdentifier::new(self.object_type, self.instance_id)
    }

    /// The write-type rule this descriptor's object type implies (§3 WriteKind).
    pub fn write_kind(&self) -> WriteKind {
        WriteKind::for_object_type(self.object_type)
    }
}

// Comfort button [RW]. 0 = Away after delay (also overrides ventilation
// mode); 1 = follow the room operating mode.
pub const COMFORT_BUTTON: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::BinaryValue, 50).with_priority(13);
pub const COMFORT_BUTTON_ACTIVE: u8 = 1;
pub const COMFORT_BUTTON_INACTIVE: u8 = 0;

/// Delay (minutes) applied when deactivating the comfort button.
pub const COMFORT_BUTTON_DELAY: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::PositiveIntegerValue, 318);

/// Heat recovery ventilation operation state (read-only).
pub const OPERATION_MODE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::MultiStateValue, 361);
pub const OPERATION_MODE_OFF: u8 = 1;
pub const OPERATION_MODE_AWAY: u8 = 2;
pub const OPERATION_MODE_HOME: u8 = 3;
pub const OPERATION_MODE_HIGH: u8 = 4;
pub const OPERATION_MODE_FUME_HOOD: u8 = 5;
pub const OPERATION_MODE_FIREPLACE: u8 = 6;
pub const OPERATION_MODE_TEMPORARY_HIGH: u8 = 7;

pub fn operation_mode_label(code: u8) -> Option<&'static str> {
    Some(match code {
        OPERATION_MODE_OFF => "Off",
        OPERATION_MODE_AWAY => "Away",
        OPERATION_MODE_HOME => "Home",
        OPERATION_MODE_HIGH => "High",
        OPERATION_MODE_FUME_HOOD => "Fume hood",
        OPERATION_MODE_FIREPLACE => "Fireplace",
        OPERATION_MODE_TEMPORARY_HIGH => "Temporary high",
        _ => return None,
    })
}

/// Ventilation mode [RW]. Only effective while the comfort button is active;
/// otherwise the device forces Away.
pub const VENTILATION_MODE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::MultiStateValue, 42).with_priority(13);
pub const VENTILATION_MODE_STOP: u8 = 1;
pub const VENTILATION_MODE_AWAY: u8 = 2;
pub const VENTILATION_MODE_HOME: u8 = 3;
pub const VENTILATION_MODE_HIGH: u8 = 4;

pub fn ventilation_mode_label(code: u8) -> Option<&'static str> {
    Some(match code {
        VENTILATION_MODE_STOP => "Stop",
        VENTILATION_MODE_AWAY => "Away",
        VENTILATION_MODE_HOME => "Home",
        VENTILATION_MODE_HIGH => "High",
        _ => return None,
    })
}

/// Air temperature setpoint for Away mode, degrees Celsius.
pub const AIR_TEMP_SETPOINT_AWAY: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1985);
/// Air temperature setpoint for Home mode, degrees Celsius.
pub const AIR_TEMP_SETPOINT_HOME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1994);

/// Trigger for temporary fireplace ventilation.
pub const FIREPLACE_VENTILATION: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::MultiStateValue, 360);
pub const FIREPLACE_VENTILATION_TRIGGER: u8 = 2;
/// Requested runtime (minutes) for fireplace ventilation.
pub const FIREPLACE_VENTILATION_RUNTIME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::PositiveIntegerValue, 270);
/// Remaining duration (minutes) of fireplace ventilation, read-only.
pub const FIREPLACE_VENTILATION_REMAINING_DURATION: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 2038);

/// Trigger for temporary rapid ventilation.
pub const RAPID_VENTILATION: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::MultiStateValue, 357);
pub const RAPID_VENTILATION_TRIGGER: u8 = 2;
/// Requested runtime (minutes) for rapid ventilation.
pub const RAPID_VENTILATION_RUNTIME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::PositiveIntegerValue, 293);
/// Remaining duration (minutes) of rapid ventilation, read-only.
pub const RAPID_VENTILATION_REMAINING_DURATION: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 2031);

pub const OUTSIDE_AIR_TEMPERATURE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogInput, 1);
pub const SUPPLY_AIR_TEMPERATURE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogInput, 4);
pub const TACHO_SUPPLY_FAN: PropertyDescriptor = PropertyDescriptor::new(ObjectType::AnalogInput, 5);
pub const EXHAUST_AIR_TEMPERATURE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogInput, 11);
pub const TACHO_EXHAUST_FAN: PropertyDescriptor = PropertyDescriptor::new(ObjectType::AnalogInput, 12);
pub const EXTRACT_AIR_TEMPERATURE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogInput, 59);
pub const ROOM_TEMPERATURE: PropertyDescriptor = PropertyDescriptor::new(ObjectType::AnalogInput, 75);

pub const FAN_SPEED_SUPPLY_AIR: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogOutput, 3);
pub const FAN_SPEED_EXHAUST_AIR: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogOutput, 4);
pub const ROTATING_HEAT_EXCHANGER_SPEED: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogOutput, 0);
pub const ROTATING_HEAT_EXCHANGER_EFFICIENCY: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 2023);

pub const ELECTRICAL_HEATER: PropertyDescriptor = PropertyDescriptor::new(ObjectType::BinaryValue, 445);
pub const ELECTRICAL_HEATER_ACTIVE: u8 = 1;
pub const ELECTRICAL_HEATER_INACTIVE: u8 = 0;
pub const ELECTRIC_HEATER_NOM_POWER: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 190);
pub const HEATING_COIL_ELECTRIC_POWER: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 194);

pub const COOKER_HOOD: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::BinaryValue, 402).with_priority(13);
pub const COOKER_HOOD_ACTIVE: u8 = 1;
pub const COOKER_HOOD_INACTIVE: u8 = 0;

pub const LINEAR_SETPOINT_SUPPLY_AIR_HIGH: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1835);
pub const LINEAR_SETPOINT_SUPPLY_AIR_HOME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1836);
pub const LINEAR_SETPOINT_SUPPLY_AIR_AWAY: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1837);
pub const LINEAR_SETPOINT_SUPPLY_AIR_FIRE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1838);
pub const LINEAR_SETPOINT_SUPPLY_AIR_COOKER: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1839);
pub const LINEAR_SETPOINT_EXHAUST_AIR_HIGH: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1840);
pub const LINEAR_SETPOINT_EXHAUST_AIR_HOME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1841);
pub const LINEAR_SETPOINT_EXHAUST_AIR_AWAY: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1842);
pub const LINEAR_SETPOINT_EXHAUST_AIR_FIRE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1843);
pub const LINEAR_SETPOINT_EXHAUST_AIR_COOKER: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 1844);

pub const AIR_FILTER_OPERATING_TIME: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 285);
pub const AIR_FILTER_TIME_PERIOD_FOR_EXCHANGE: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::AnalogValue, 286);
pub const AIR_FILTER_POLLUTED: PropertyDescriptor = PropertyDescriptor::new(ObjectType::BinaryValue, 522);
pub const AIR_FILTER_POLLUTED_ACTIVE: u8 = 1;
pub const AIR_FILTER_REPLACE_TIMER_RESET: PropertyDescriptor =
    PropertyDescriptor::new(ObjectType::MultiStateValue, 613);
pub const AIR_FILTER_REPLACE_TIMER_RESET_TRIGGER: u8 = 2;

/// Every property this library reads on `update()`. Static and exhaustive
/// relative to the upstream Nordic config; order does not affect correctness.
pub static DEVICE_PROPERTIES: &[PropertyDescriptor] = &[
    COMFORT_BUTTON,
    COMFORT_BUTTON_DELAY,
    OPERATION_MODE,
    VENTILATION_MODE,
    AIR_TEMP_SETPOINT_AWAY,
    AIR_TEMP_SETPOINT_HOME,
    FIREPLACE_VENTILATION,
    FIREPLACE_VENTILATION_RUNTIME,
    FIREPLACE_VENTILATION_REMAINING_DURATION,
    RAPID_VENTILATION,
    RAPID_VENTILATION_RUNTIME,
    RAPID_VENTILATION_REMAINING_DURATION,
    OUTSIDE_AIR_TEMPERATURE,
    SUPPLY_AIR_TEMPERATURE,
    TACHO_SUPPLY_FAN,
    EXHAUST_AIR_TEMPERATURE,
    TACHO_EXHAUST_FAN,
    EXTRACT_AIR_TEMPERATURE,
    ROOM_TEMPERATURE,
    FAN_SPEED_SUPPLY_AIR,
    FAN_SPEED_EXHAUST_AIR,
    ROTATING_HEAT_EXCHANGER_SPEED,
    ROTATING_HEAT_EXCHANGER_EFFICIENCY,
    ELECTRICAL_HEATER,
    ELECTRIC_HEATER_NOM_POWER,
    HEATING_COIL_ELECTRIC_POWER,
    COOKER_HOOD,
    LINEAR_SETPOINT_SUPPLY_AIR_HIGH,
    LINEAR_SETPOINT_SUPPLY_AIR_HOME,
    LINEAR_SETPOINT_SUPPLY_AIR_AWAY,
    LINEAR_SETPOINT_SUPPLY_AIR_FIRE,
    LINEAR_SETPOINT_SUPPLY_AIR_COOKER,
    LINEAR_SETPOINT_EXHAUST_AIR_HIGH,
    LINEAR_SETPOINT_EXHAUST_AIR_HOME,
    LINEAR_SETPOINT_EXHAUST_AIR_AWAY,
    LINEAR_SETPOINT_EXHAUST_AIR_FIRE,
    LINEAR_SETPOINT_EXHAUST_AIR_COOKER,
    AIR_FILTER_OPERATING_TIME,
    AIR_FILTER_TIME_PERIOD_FOR_EXCHANGE,
    AIR_FILTER_POLLUTED,
    AIR_FILTER_REPLACE_TIMER_RESET,
];

/// The device object itself, read for its name and description (serial
/// number). `instance_id` is supplied by the caller when constructing the
/// façade, so this returns a descriptor rather than a constant.
pub fn device_object(device_id: u32) -> PropertyDescriptor {
    PropertyDescriptor::new(ObjectType::Device, device_id)
        .with_read_values(&[PropertyId::ObjectName, PropertyId::Description])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_non_empty_and_unique() {
        use std::collections::HashSet;
        assert!(!DEVICE_PROPERTIES.is_empty());
        let ids: HashSet<_> = DEVICE_PROPERTIES
            .iter()
            .map(|d| (d.object_type, d.instance_id))
            .collect();
        assert_eq!(ids.len(), DEVICE_PROPERTIES.len(), "duplicate descriptor in catalogue");
    }

    #[test]
    fn write_kind_follows_object_type() {
        assert_eq!(VENTILATION_MODE.write_kind(), WriteKind::UnsignedInt);
        assert_eq!(COMFORT_BUTTON.write_kind(), WriteKind::Enumerated);
        assert_eq!(AIR_TEMP_SETPOINT_HOME.write_kind(), WriteKind::Real);
    }
}
