//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to                 |
//! |-------------|-------------------------|-----------------------------|
//! | `hardware`  | ButtonPort, SensorPort, | relays, buttons, ADE7953,   |
//! |             | MotorPort               | NTC                         |
//! | `thing`     | ThingPort               | property/action protocol    |
//! | `log_sink`  | EventSink               | serial log output           |
//! | `nvs`       | ConfigPort              | NVS / in-memory store       |
//! | `time`      | (clock)                 | ESP32 system timer          |
//! | `device_id` | (identity)              | eFuse MAC                   |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod thing;
pub mod time;
