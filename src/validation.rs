//! Input validation for network configurations.
//!
//! Checks structural integrity of a [`NetworkConfig`] before any node id
//! is computed. Detects:
//! - Empty networks
//! - Connections referencing unknown hubs
//! - Self connections
//! - Zero capacities
//! - Zero transit delays
//! - Restricted connection ids that collide or fall outside the transit id space
//! - Graphs too large to allocate
//!
//! Every problem found is reported, not just the first one.

use std::collections::HashSet;
use std::fmt;

use crate::graph::NodeIndex;
use crate::models::{HubId, NetworkConfig};

/// Largest node count a configuration may expand to.
pub const MAX_NODE_COUNT: usize = 1 << 28;

/// Largest edge count a configuration may expand to.
pub const MAX_EDGE_COUNT: usize = 1 << 28;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The configuration has no hubs.
    EmptyNetwork,
    /// A connection endpoint is not a configured hub.
    InvalidHubReference,
    /// A connection starts and ends at the same hub.
    SelfConnection,
    /// A capacity is zero.
    InvalidCapacity,
    /// A restricted connection has zero delay.
    InvalidDelay,
    /// Two restricted connections share an id.
    DuplicateConnectionId,
    /// A restricted connection id lies outside the transit id space.
    ConnectionIdOutOfRange,
    /// The expanded graph exceeds [`MAX_NODE_COUNT`] or [`MAX_EDGE_COUNT`].
    GraphTooLarge,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates a network configuration.
///
/// Checks:
/// 1. At least one hub
/// 2. Non-zero hub, wait and arrival capacities
/// 3. Ordinary connections reference existing, distinct hubs with non-zero capacity
/// 4. Restricted connections do the same and have a non-zero delay
/// 5. Restricted ids are unique and below the transit id space size `R`
/// 6. The expanded graph stays within [`MAX_NODE_COUNT`] and [`MAX_EDGE_COUNT`]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &NetworkConfig) -> ValidationResult {
    let mut errors = Vec::new();
    let hub_count = config.hub_count();

    if hub_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyNetwork,
            "Network has no hubs",
        ));
    }

    for (id, hub) in config.hubs.iter().enumerate() {
        if hub.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("Hub {id} ('{}') has zero capacity", hub.name),
            ));
        }
    }
    if config.wait_capacity == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCapacity,
            "Wait capacity must be positive",
        ));
    }
    if config.arrival_capacity == Some(0) {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCapacity,
            "Arrival capacity must be positive",
        ));
    }

    for (i, c) in config.connections.iter().enumerate() {
        let label = format!("Connection #{i}");
        check_endpoints(&label, c.origin, c.destination, hub_count, &mut errors);
        if c.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("{label} has zero capacity"),
            ));
        }
    }

    let slots = config.transit_slot_count();
    let mut ids = HashSet::new();
    for r in &config.restricted {
        let label = format!("Restricted connection {}", r.id);
        check_endpoints(&label, r.origin, r.destination, hub_count, &mut errors);
        if r.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                format!("{label} has zero capacity"),
            ));
        }
        if r.delay == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDelay,
                format!("{label} has zero delay"),
            ));
        }
        if !ids.insert(r.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateConnectionId,
                format!("Duplicate restricted connection id: {}", r.id),
            ));
        }
        if r.id >= slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::ConnectionIdOutOfRange,
                format!("{label} exceeds transit id space of {slots}"),
            ));
        }
    }

    match graph_size(config) {
        Some((nodes, edges)) if nodes <= MAX_NODE_COUNT && edges <= MAX_EDGE_COUNT => {}
        Some((nodes, edges)) => errors.push(ValidationError::new(
            ValidationErrorKind::GraphTooLarge,
            format!(
                "Graph needs {nodes} nodes and {edges} edges \
                 (limits: {MAX_NODE_COUNT} nodes, {MAX_EDGE_COUNT} edges)"
            ),
        )),
        None => errors.push(ValidationError::new(
            ValidationErrorKind::GraphTooLarge,
            format!("Graph size overflows for horizon {}", config.horizon),
        )),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Node and edge counts of the expanded graph, `None` on overflow.
fn graph_size(config: &NetworkConfig) -> Option<(usize, usize)> {
    let nodes = NodeIndex::for_config(config).checked_node_count()?;

    let t = config.horizon;
    let mut edges = config.hub_count().checked_mul(t.checked_add(1)?)?;
    edges = edges.checked_add(config.wait_capable_hubs().count().checked_mul(t)?)?;
    edges = edges.checked_add(config.connections.len().checked_mul(t)?)?;
    for r in &config.restricted {
        edges = edges.checked_add(r.departures(t).len().checked_mul(2)?)?;
    }
    Some((nodes, edges))
}

fn check_endpoints(
    label: &str,
    origin: HubId,
    destination: HubId,
    hub_count: usize,
    errors: &mut Vec<ValidationError>,
) {
    for (end, hub) in [("origin", origin), ("destination", destination)] {
        if hub >= hub_count {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHubReference,
                format!("{label} references unknown {end} hub {hub}"),
            ));
        }
    }
    if origin == destination {
        errors.push(ValidationError::new(
            ValidationErrorKind::SelfConnection,
            format!("{label} starts and ends at hub {origin}"),
        ));
    }
}
