//! Reads and writes the JSON summary of a [`Netlist`].
//!
//! The summary is an object with `Gates`, `Wires`, `Contexts` and `Outputs` members. Gate inputs and outputs, wire
//! endpoints, and outputs are written as bare ids; on import, wire references may also be objects carrying an `Id`.

use std::fmt::Display;
use std::io::{Read, Write};

use jzon::JsonValue;
use lovelace_netlist::{CallingContext, ContextId, Gate, GateId, GateKind, Netlist, Wire, WireId};
use tracing::debug;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(jzon::Error),
    Schema(String),
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<jzon::Error> for Error {
    fn from(error: jzon::Error) -> Self {
        Self::Json(error)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(error) => write!(f, "i/o error: {error}"),
            Error::Json(error) => write!(f, "json error: {error}"),
            Error::Schema(message) => write!(f, "schema error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            Error::Json(error) => Some(error),
            Error::Schema(_) => None,
        }
    }
}

fn ids<T: Into<u32> + Copy>(ids: &[T]) -> JsonValue {
    JsonValue::Array(ids.iter().map(|&id| JsonValue::from(Into::<u32>::into(id))).collect())
}

fn optional(id: Option<u32>) -> JsonValue {
    id.map_or(JsonValue::Null, JsonValue::from)
}

fn export_gate(gate: &Gate) -> JsonValue {
    let mut value = JsonValue::new_object();
    value["Id"] = gate.id.0.into();
    value["Type"] = gate.kind.as_str().into();
    value["Label"] = gate.label.as_str().into();
    value["Inputs"] = ids(&gate.inputs);
    value["Outputs"] = ids(&gate.outputs);
    value["CallingContext"] = gate.context.0.into();
    value["State"] = gate.state.as_str().into();
    value
}

fn export_wire(wire: &Wire) -> JsonValue {
    let mut value = JsonValue::new_object();
    value["Id"] = wire.id.0.into();
    value["Desc"] = wire.desc.as_deref().map_or(JsonValue::Null, JsonValue::from);
    value["Start"] = optional(wire.start.map(|id| id.0));
    value["End"] = optional(wire.end.map(|id| id.0));
    value["Powered"] = wire.powered.into();
    value
}

fn export_context(context: &CallingContext) -> JsonValue {
    let mut value = JsonValue::new_object();
    value["Id"] = context.id.0.into();
    value["Name"] = context.name.as_str().into();
    value["Depth"] = context.depth.into();
    value["Parent"] = context.parent.0.into();
    value["Children"] = ids(&context.children);
    value
}

/// Builds the summary object without serializing it.
pub fn to_json(netlist: &Netlist) -> JsonValue {
    let mut summary = JsonValue::new_object();
    summary["Gates"] = JsonValue::Array(netlist.gates().iter().map(export_gate).collect());
    summary["Wires"] = JsonValue::Array(netlist.wires().iter().map(export_wire).collect());
    summary["Contexts"] = JsonValue::Array(netlist.contexts().iter().map(export_context).collect());
    summary["Outputs"] = ids(netlist.outputs());
    summary
}

pub fn export(writer: &mut impl Write, netlist: &Netlist) -> std::io::Result<()> {
    debug!(gates = netlist.gates().len(), wires = netlist.wires().len(), "exporting summary");
    to_json(netlist).write_pretty(writer, 2)?;
    writeln!(writer)
}

fn schema(message: impl Into<String>) -> Error {
    Error::Schema(message.into())
}

fn field<'a>(value: &'a JsonValue, name: &str, within: &str) -> Result<&'a JsonValue, Error> {
    match &value[name] {
        JsonValue::Null => Err(schema(format!("{within} is missing {name:?}"))),
        field => Ok(field),
    }
}

fn number(value: &JsonValue, name: &str, within: &str) -> Result<u32, Error> {
    field(value, name, within)?.as_u32().ok_or_else(|| schema(format!("{within} field {name:?} is not an id")))
}

fn string(value: &JsonValue, name: &str) -> String {
    value[name].as_str().unwrap_or_default().to_owned()
}

/// A wire reference is either a bare id or an object with an `Id` member.
fn reference(value: &JsonValue, within: &str) -> Result<u32, Error> {
    if value.is_object() {
        number(value, "Id", within)
    } else {
        value.as_u32().ok_or_else(|| schema(format!("{within} has a malformed wire reference")))
    }
}

fn references(value: &JsonValue, within: &str) -> Result<Vec<u32>, Error> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    if !value.is_array() {
        return Err(schema(format!("{within} expected an array")));
    }
    value.members().map(|member| reference(member, within)).collect()
}

fn optional_reference(value: &JsonValue, within: &str) -> Result<Option<u32>, Error> {
    if value.is_null() { Ok(None) } else { reference(value, within).map(Some) }
}

fn import_gate(value: &JsonValue) -> Result<Gate, Error> {
    let id = number(value, "Id", "gate")?;
    let within = format!("gate #{id}");
    let kind: GateKind = field(value, "Type", &within)?
        .as_str()
        .ok_or_else(|| schema(format!("{within} has a non-string type")))?
        .parse()
        .map_err(|error| schema(format!("{within}: {error}")))?;
    let context = value["CallingContext"].as_u32().unwrap_or_default();
    let mut gate = Gate::new(GateId(id), kind, ContextId(context))
        .with_label(string(value, "Label"))
        .with_inputs(references(&value["Inputs"], &within)?.into_iter().map(WireId))
        .with_outputs(references(&value["Outputs"], &within)?.into_iter().map(WireId));
    gate.state = string(value, "State");
    Ok(gate)
}

fn import_wire(value: &JsonValue) -> Result<Wire, Error> {
    let id = number(value, "Id", "wire")?;
    let within = format!("wire %{id}");
    let mut wire = Wire::new(WireId(id));
    wire.desc = value["Desc"].as_str().map(str::to_owned);
    wire.start = optional_reference(&value["Start"], &within)?.map(GateId);
    wire.end = optional_reference(&value["End"], &within)?.map(GateId);
    wire.powered = value["Powered"].as_bool().unwrap_or(false);
    Ok(wire)
}

fn import_context(value: &JsonValue) -> Result<CallingContext, Error> {
    let id = number(value, "Id", "context")?;
    let within = format!("context @{id}");
    let depth = value["Depth"].as_usize().unwrap_or_default();
    let parent = value["Parent"].as_u32().unwrap_or_default();
    let mut context = CallingContext::new(ContextId(id), string(value, "Name"), depth, ContextId(parent));
    context.children = references(&value["Children"], &within)?.into_iter().map(ContextId).collect();
    Ok(context)
}

fn array<'a>(summary: &'a JsonValue, name: &str) -> Result<impl Iterator<Item = &'a JsonValue>, Error> {
    match &summary[name] {
        JsonValue::Null => Err(schema(format!("summary is missing {name:?}"))),
        value if value.is_array() => Ok(value.members()),
        _ => Err(schema(format!("summary member {name:?} is not an array"))),
    }
}

/// Rebuilds a netlist from a summary object. `Contexts` and `Outputs` may be absent.
pub fn from_json(summary: &JsonValue) -> Result<Netlist, Error> {
    if !summary.is_object() {
        return Err(schema("summary is not an object"));
    }
    let gates = array(summary, "Gates")?.map(import_gate).collect::<Result<Vec<_>, _>>()?;
    let wires = array(summary, "Wires")?.map(import_wire).collect::<Result<Vec<_>, _>>()?;
    let mut netlist = Netlist::from_parts(gates, wires);
    if !summary["Contexts"].is_null() {
        for context in array(summary, "Contexts")? {
            netlist.add_context(import_context(context)?);
        }
    }
    let outputs = references(&summary["Outputs"], "summary outputs")?;
    netlist.set_outputs(outputs.into_iter().map(WireId).collect());
    Ok(netlist)
}

pub fn import(reader: &mut impl Read) -> Result<Netlist, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let netlist = from_json(&jzon::parse(&text)?)?;
    debug!(gates = netlist.gates().len(), wires = netlist.wires().len(), "imported summary");
    Ok(netlist)
}
