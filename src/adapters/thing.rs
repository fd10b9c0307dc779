//! WebThings-style property/action adapter.
//!
//! Implements [`ThingPort`] for the control core and gives the protocol
//! layer what it needs to serve the device: the action and property
//! tables, the current property values and JSON renderings of both.
//!
//! Actions are parameterless.  [`ThingAdapter::invoke_action`] runs on
//! the protocol handler's side and only posts into the shared
//! [`CommandMailbox`]; the control loop picks the command up on its next
//! poll through [`ThingPort::read_command`].

use core::fmt;

use log::{info, warn};
use serde::Serialize;

use crate::app::commands::{CommandMailbox, DriveCommand};
use crate::app::ports::{Property, ThingPort};

/// Static description of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    #[serde(skip)]
    pub command: DriveCommand,
    pub title: &'static str,
    pub description: &'static str,
    #[serde(rename = "@type")]
    pub semantic_type: &'static str,
}

pub const ACTIONS: [ActionSpec; 3] = [
    ActionSpec {
        command: DriveCommand::Stop,
        title: "Stop",
        description: "Whether the shutter stops driving",
        semantic_type: "ToggleAction",
    },
    ActionSpec {
        command: DriveCommand::Up,
        title: "Up",
        description: "Whether the shutter drives up",
        semantic_type: "ToggleAction",
    },
    ActionSpec {
        command: DriveCommand::Down,
        title: "Down",
        description: "Whether the shutter drives down",
        semantic_type: "ToggleAction",
    },
];

/// Static description of one numeric, read-only property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    #[serde(skip)]
    pub property: Property,
    pub description: &'static str,
    #[serde(rename = "@type")]
    pub semantic_type: &'static str,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    pub unit: &'static str,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
}

pub const PROPERTIES: [PropertySpec; 2] = [
    PropertySpec {
        property: Property::Power,
        description: "The current power consumption in watt",
        semantic_type: "InstantaneousPowerProperty",
        value_type: "number",
        unit: "watt",
        read_only: true,
    },
    PropertySpec {
        property: Property::Temperature,
        description: "The current temperature of the device in °C",
        semantic_type: "TemperatureProperty",
        value_type: "number",
        unit: "degree celsius",
        read_only: true,
    },
];

/// An action name that is not in [`ACTIONS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub heapless::String<16>);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

#[derive(Serialize)]
struct Description<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    types: [&'static str; 0],
    properties: std::collections::BTreeMap<&'static str, PropertySpec>,
    actions: std::collections::BTreeMap<&'static str, ActionSpec>,
}

pub struct ThingAdapter {
    mailbox: &'static CommandMailbox,
    id: heapless::String<16>,
    title: heapless::String<48>,
    values: [f32; 2],
}

impl ThingAdapter {
    /// Property values start at 0 until the core publishes baselines.
    pub fn new(mailbox: &'static CommandMailbox, id: &str, title: &str) -> Self {
        Self {
            mailbox,
            id: truncated(id),
            title: truncated(title),
            values: [0.0; 2],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Handle an incoming action request by name.
    pub fn invoke_action(&self, name: &str) -> Result<DriveCommand, UnknownAction> {
        let Some(cmd) = DriveCommand::from_action_name(name) else {
            warn!("thing: rejected action '{}'", name);
            return Err(UnknownAction(truncated(name)));
        };
        info!("thing: action '{}'", name);
        self.mailbox.post(cmd);
        Ok(cmd)
    }

    /// Current value of a property.
    pub fn property_value(&self, property: Property) -> f32 {
        self.values[Self::slot(property)]
    }

    /// Look a property up by its protocol name.
    pub fn property_by_name(&self, name: &str) -> Option<f32> {
        Property::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .map(|p| self.property_value(p))
    }

    /// `{"power": .., "temperature": ..}`
    pub fn properties_json(&self) -> serde_json::Result<String> {
        let map: std::collections::BTreeMap<&str, f32> = Property::ALL
            .into_iter()
            .map(|p| (p.name(), self.property_value(p)))
            .collect();
        serde_json::to_string(&map)
    }

    /// The full thing description.
    pub fn description_json(&self) -> serde_json::Result<String> {
        let desc = Description {
            id: &self.id,
            title: &self.title,
            context: "https://webthings.io/schemas",
            types: [],
            properties: PROPERTIES
                .into_iter()
                .map(|p| (p.property.name(), p))
                .collect(),
            actions: ACTIONS
                .into_iter()
                .map(|a| (a.command.action_name(), a))
                .collect(),
        };
        serde_json::to_string(&desc)
    }

    fn slot(property: Property) -> usize {
        match property {
            Property::Power => 0,
            Property::Temperature => 1,
        }
    }
}

impl ThingPort for ThingAdapter {
    fn publish(&mut self, property: Property, value: f32) {
        self.values[Self::slot(property)] = value;
    }

    fn read_command(&mut self) -> Option<DriveCommand> {
        self.mailbox.take()
    }
}

/// Copy as many whole characters of `s` as fit.
fn truncated<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
