//! Environment facts: temperature, power, fans, CPU and memory.
//!
//! # Output Examples
//!
//! `show chassis`:
//!
//! ```text
//! Power supply 1 (AC - Regular) present, status ok
//! Power supply 2 detected, status failed
//! Fan 1 ok, speed (auto):  [[1]]<->2
//! Current temperature : 36.5 deg-C (Sensor 1), 41.0 deg-C (Sensor 2)
//! Warning level.......: 80.0 deg-C
//! Shutdown level......: 90.0 deg-C
//! ```
//!
//! `show inline power`:
//!
//! ```text
//! Power Capacity: Total is 740000 mWatts. Current Free is 680000 mWatts.
//! ```

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use crate::error::{ParseError, Result};
use crate::text::{Anchor, Tokenized, locate_all, locate_first};

use super::parse_number;

const SENSOR_READING: Anchor = Anchor::new("(Sensor", -2);
const WARNING_THRESHOLD: Anchor = Anchor::new("Warning", 2);
const SHUTDOWN_THRESHOLD: Anchor = Anchor::new("Shutdown", 2);

const PSU_ID: Anchor = Anchor::new("Power", 2);
const PSU_STATUS: Anchor = Anchor::new("Power", 5);
const PSU_NORMAL_STATUS: Anchor = Anchor::new("Power", 8);
const PSU_FAILED: &str = "failed";
const PSU_OK: &str = "ok";

/// Inline power budget, in milliwatts.
const POWER_TOTAL: Anchor = Anchor::new("Free", -3);
const POWER_FREE: Anchor = Anchor::new("Free", 2);
const MILLIWATTS_PER_WATT: f64 = 1000.0;

const FANLESS_MARKER: &str = "Fanless";
const FAN_UNIT: Anchor = Anchor::new("Fan", 1);
const FAN_STATUS: Anchor = Anchor::new("Fan", 2);
const FAN_OK: &str = "ok,";
const FAN_FAILED: &str = "failed";

const CPU_PERCENT: Anchor = Anchor::new("percent", -1);

const MEMORY_TOTAL: Anchor = Anchor::new("Dynamic", 2);
const MEMORY_FREE: Anchor = Anchor::new("Dynamic", 5);

/// One temperature sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureReading {
    pub temperature: f64,
    /// At or above the warning threshold.
    pub is_alert: bool,
    /// At or above the shutdown threshold.
    pub is_critical: bool,
}

/// One power supply.
///
/// `capacity` and `output` come from the shared inline-power budget, not a
/// per-PSU figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerSupply {
    pub status: bool,
    pub capacity: f64,
    pub output: f64,
    /// Normal-status token when the PSU reported neither `failed` nor `ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<String>,
}

/// One fan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FanStatus {
    pub status: bool,
}

/// CPU utilisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuUsage {
    #[serde(rename = "%usage")]
    pub usage: f64,
}

/// Dynamic memory, in bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryUsage {
    pub available_ram: u64,
    pub used_ram: u64,
}

/// All environment facts for a switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Environment {
    /// `None` for fanless chassis.
    #[serde(rename = "fan")]
    pub fans: Option<IndexMap<String, FanStatus>>,
    pub temperature: IndexMap<String, TemperatureReading>,
    pub power: IndexMap<String, PowerSupply>,
    pub cpu: CpuUsage,
    pub memory: MemoryUsage,
}

/// Sensor readings keyed `sensor 1`, `sensor 2`, ... in report order.
///
/// Both thresholds must be present whenever at least one sensor is.
/// Comparisons are greater-or-equal.
pub fn environment_temperature(text: &str) -> Result<IndexMap<String, TemperatureReading>> {
    let readings = locate_all(text, &SENSOR_READING)?;
    let mut sensors = IndexMap::new();

    if readings.is_empty() {
        return Ok(sensors);
    }

    let warning: f64 = parse_number("warning threshold", locate_first(text, &WARNING_THRESHOLD)?)?;
    let shutdown: f64 =
        parse_number("shutdown threshold", locate_first(text, &SHUTDOWN_THRESHOLD)?)?;

    for (i, reading) in readings.iter().enumerate() {
        let temperature: f64 = parse_number("temperature", reading)?;
        sensors.insert(
            format!("sensor {}", i + 1),
            TemperatureReading {
                temperature,
                is_alert: temperature >= warning,
                is_critical: temperature >= shutdown,
            },
        );
    }

    Ok(sensors)
}

/// Power supplies keyed `PSU<n>`.
///
/// A `failed` status reports zero capacity and output; an `ok` normal
/// status reports the shared inline budget. Anything else is reported with
/// `status = false` and the raw token in `raw_status`.
pub fn environment_power(
    chassis_text: &str,
    inline_text: &str,
) -> Result<IndexMap<String, PowerSupply>> {
    let chassis = Tokenized::new(chassis_text);
    let positions = chassis.positions(PSU_ID.word);
    let mut supplies = IndexMap::new();

    if positions.is_empty() {
        return Ok(supplies);
    }

    let (capacity, output) = power_budget(inline_text)?;

    for index in positions {
        let id = chassis.at(index, &PSU_ID)?;
        let status = chassis.at(index, &PSU_STATUS)?;

        let supply = if status == PSU_FAILED {
            PowerSupply {
                status: false,
                capacity: 0.0,
                output: 0.0,
                raw_status: None,
            }
        } else {
            // Only supplies that did not fail report a normal status
            let normal = chassis.at(index, &PSU_NORMAL_STATUS)?;
            if normal == PSU_OK {
                PowerSupply {
                    status: true,
                    capacity,
                    output,
                    raw_status: None,
                }
            } else {
                warn!("PSU {id}: unrecognized status '{status}' / '{normal}'");
                PowerSupply {
                    status: false,
                    capacity: 0.0,
                    output: 0.0,
                    raw_status: Some(normal.to_string()),
                }
            }
        };
        supplies.insert(format!("PSU{id}"), supply);
    }

    Ok(supplies)
}

/// Total capacity and power drawn, in watts, from `show inline power`.
fn power_budget(inline_text: &str) -> Result<(f64, f64)> {
    let total: f64 = parse_number("inline power total", locate_first(inline_text, &POWER_TOTAL)?)?;
    let free: f64 = parse_number("inline power free", locate_first(inline_text, &POWER_FREE)?)?;

    let capacity = total / MILLIWATTS_PER_WATT;
    Ok((capacity, capacity - free / MILLIWATTS_PER_WATT))
}

/// Fans keyed `fan<n>`, or `None` for a fanless chassis.
///
/// Lines starting with `Fan` whose status is neither `ok,` nor `failed`
/// (e.g. `Fan controlled temperature`) are not fans and are skipped.
pub fn environment_fan(text: &str) -> Result<Option<IndexMap<String, FanStatus>>> {
    if text.contains(FANLESS_MARKER) {
        return Ok(None);
    }

    let units = locate_all(text, &FAN_UNIT)?;
    let statuses = locate_all(text, &FAN_STATUS)?;
    let mut fans = IndexMap::new();

    for (unit, status) in units.iter().zip(&statuses) {
        let ok = match *status {
            FAN_OK => true,
            FAN_FAILED => false,
            _ => continue,
        };
        fans.insert(format!("fan{unit}"), FanStatus { status: ok });
    }

    Ok(Some(fans))
}

/// Highest CPU busy percentage in `show cpu`.
pub fn environment_cpu(text: &str) -> Result<CpuUsage> {
    let mut usage: Option<f64> = None;

    for token in locate_all(text, &CPU_PERCENT)? {
        let value: f64 = parse_number("cpu usage", token)?;
        usage = Some(usage.map_or(value, |max| max.max(value)));
    }

    usage
        .map(|usage| CpuUsage { usage })
        .ok_or_else(|| ParseError::anchor_not_found(CPU_PERCENT.word, text).into())
}

/// Dynamic memory totals from `show memory`.
pub fn environment_memory(text: &str) -> Result<MemoryUsage> {
    let total: u64 = parse_number("memory total", locate_first(text, &MEMORY_TOTAL)?)?;
    let free: u64 = parse_number("memory free", locate_first(text, &MEMORY_FREE)?)?;

    Ok(MemoryUsage {
        available_ram: total,
        used_ram: total.saturating_sub(free),
    })
}

/// Gather every environment fact from the four reports that carry them.
pub fn environment(
    chassis_text: &str,
    inline_text: &str,
    cpu_text: &str,
    memory_text: &str,
) -> Result<Environment> {
    Ok(Environment {
        fans: environment_fan(chassis_text)?,
        temperature: environment_temperature(chassis_text)?,
        power: environment_power(chassis_text, inline_text)?,
        cpu: environment_cpu(cpu_text)?,
        memory: environment_memory(memory_text)?,
    })
}
