//! Map file parser.
//!
//! Directives, one per line:
//!
//! | Key | Payload | Occurrences |
//! |-----|---------|-------------|
//! | `nb_drones` | positive integer | exactly one |
//! | `start_hub` | `<name> <x> <y> [metadata]` | exactly one |
//! | `end_hub` | `<name> <x> <y> [metadata]` | exactly one |
//! | `hub` | `<name> <x> <y> [metadata]` | any |
//! | `connection` | `<a>-<b> [metadata]` | any |
//!
//! Blank lines and lines starting with `#` are ignored. Coordinates may be
//! negative. Metadata is a bracketed list of `key=value` items; hubs accept
//! `zone`, `color` and `max_drones`, connections accept `max_link_capacity`.

use std::collections::HashSet;

use super::{FlightMap, MapConnection, MapError, MapHub, Zone};
use crate::models::Capacity;

/// Parses map text into a [`FlightMap`].
///
/// Line-level problems are reported as [`MapError::Parse`] with the
/// 1-based line number; cross-line problems (missing directives, name
/// clashes, dangling connection endpoints) are checked afterwards.
pub fn parse_map(text: &str) -> Result<FlightMap, MapError> {
    let mut nb_drones = None;
    let mut start_hub = None;
    let mut end_hub = None;
    let mut hubs = Vec::new();
    let mut connections = Vec::new();
    let mut seen_once = HashSet::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let at = |message: String| MapError::Parse {
            line: i + 1,
            message,
        };

        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| at("no ':' character in line".into()))?;
        let key = key.trim();

        match key {
            "nb_drones" | "start_hub" | "end_hub" => {
                if !seen_once.insert(key) {
                    return Err(at(format!("{key} must not have duplicate configs")));
                }
            }
            "hub" | "connection" => {}
            _ => {
                return Err(at(
                    "key must be 'nb_drones', 'start_hub', 'end_hub', 'hub', or 'connection'"
                        .into(),
                ))
            }
        }

        match key {
            "nb_drones" => nb_drones = Some(parse_nb_drones(value).map_err(at)?),
            "start_hub" => {
                let hub = parse_hub(value, Some(Zone::Start)).map_err(at)?;
                start_hub = Some(hub.name.clone());
                hubs.push(hub);
            }
            "end_hub" => {
                let hub = parse_hub(value, Some(Zone::End)).map_err(at)?;
                end_hub = Some(hub.name.clone());
                hubs.push(hub);
            }
            "hub" => hubs.push(parse_hub(value, None).map_err(at)?),
            _ => connections.push(parse_connection(value).map_err(at)?),
        }
    }

    let missing: Vec<&str> = [
        ("nb_drones", nb_drones.is_none()),
        ("start_hub", start_hub.is_none()),
        ("end_hub", end_hub.is_none()),
    ]
    .into_iter()
    .filter(|&(_, absent)| absent)
    .map(|(name, _)| name)
    .collect();

    let (Some(nb_drones), Some(start_hub), Some(end_hub)) = (nb_drones, start_hub, end_hub) else {
        return Err(MapError::Missing(missing.join(", ")));
    };

    let map = FlightMap {
        nb_drones,
        start_hub,
        end_hub,
        hubs,
        connections,
    };
    check_names(&map)?;
    Ok(map)
}

fn check_names(map: &FlightMap) -> Result<(), MapError> {
    let mut names = HashSet::new();
    for hub in &map.hubs {
        if !names.insert(hub.name.as_str()) {
            return Err(MapError::DuplicateHub(hub.name.clone()));
        }
    }
    for c in &map.connections {
        for end in [&c.a, &c.b] {
            if !names.contains(end.as_str()) {
                return Err(MapError::UnknownHub(end.clone()));
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Hub,
    Connection,
}

impl Target {
    fn name(self) -> &'static str {
        match self {
            Target::Hub => "hub",
            Target::Connection => "connection",
        }
    }

    fn allows(self, key: &str) -> bool {
        match self {
            Target::Hub => matches!(key, "zone" | "color" | "max_drones"),
            Target::Connection => key == "max_link_capacity",
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Metadata {
    zone: Option<Zone>,
    color: Option<String>,
    max_drones: Option<Capacity>,
    max_link_capacity: Option<Capacity>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        *self == Metadata::default()
    }
}

fn parse_metadata(token: &str, target: Target) -> Result<Metadata, String> {
    let mut meta = Metadata::default();
    let token = token.trim();
    if token.is_empty() {
        return Ok(meta);
    }
    let inner = token
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or("metadata must be enclosed in []")?;

    let mut seen = HashSet::new();
    for item in inner.split_whitespace() {
        let (key, value) = item
            .split_once('=')
            .ok_or("metadata item must be in key=value format")?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return Err("metadata key and value must be non-empty".into());
        }
        if !matches!(key, "zone" | "color" | "max_drones" | "max_link_capacity") {
            return Err(format!("unsupported metadata key: {key}"));
        }
        if !target.allows(key) {
            return Err(format!("metadata not allowed for {}: {key}", target.name()));
        }
        if !seen.insert(key) {
            return Err(format!("duplicate metadata key: {key}"));
        }

        match key {
            "zone" => meta.zone = Some(value.parse()?),
            "color" => meta.color = Some(value.to_string()),
            "max_drones" => meta.max_drones = Some(positive(key, value)?),
            _ => meta.max_link_capacity = Some(positive(key, value)?),
        }
    }
    Ok(meta)
}

fn positive(key: &str, value: &str) -> Result<Capacity, String> {
    let n: i64 = value
        .parse()
        .map_err(|_| format!("metadata {key} must be an integer"))?;
    if n < 1 {
        return Err(format!("metadata {key} must be a positive integer"));
    }
    Capacity::try_from(n).map_err(|_| format!("metadata {key} is too large"))
}

fn parse_int(s: &str) -> Result<i64, String> {
    s.parse().map_err(|_| format!("'{s}' is an invalid integer"))
}

fn parse_name(name: &str) -> Result<String, String> {
    if name.contains('-') {
        return Err("name must not include dashes (-)".into());
    }
    let name = name.trim();
    if name.is_empty() {
        return Err("name must not be an empty string".into());
    }
    Ok(name.to_string())
}

fn parse_nb_drones(value: &str) -> Result<Capacity, String> {
    let n = parse_int(value.trim())?;
    if n < 1 {
        return Err("no drones given in map".into());
    }
    Capacity::try_from(n).map_err(|_| "nb_drones is too large".to_string())
}

/// `role` is the zone implied by a `start_hub`/`end_hub` directive.
fn parse_hub(value: &str, role: Option<Zone>) -> Result<MapHub, String> {
    let params: Vec<&str> = value.trim().splitn(4, ' ').collect();
    if params.len() < 3 {
        return Err("invalid number of params. usage: hub: <name> <x> <y> [metadata]".into());
    }
    let meta = match params.get(3) {
        Some(token) => parse_metadata(token, Target::Hub)?,
        None => Metadata::default(),
    };
    if role.is_some() && meta.zone.is_some() {
        return Err("duplicate zones inputted".into());
    }

    Ok(MapHub {
        name: parse_name(params[0])?,
        x: parse_int(params[1])?,
        y: parse_int(params[2])?,
        zone: role.or(meta.zone).unwrap_or_default(),
        color: meta.color,
        max_drones: meta.max_drones.unwrap_or(1),
    })
}

fn parse_connection(value: &str) -> Result<MapConnection, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("connection must not be empty".into());
    }
    let (endpoints, meta) = match value.split_once(' ') {
        Some((endpoints, rest)) => (endpoints, Some(rest)),
        None => (value, None),
    };
    let (a, b) = endpoints
        .split_once('-')
        .ok_or("no dash (-) present in connection endpoints")?;

    let max_link_capacity = match meta {
        Some(token) => {
            let meta = parse_metadata(token, Target::Connection)?;
            if meta.is_empty() {
                return Err("empty metadata".into());
            }
            meta.max_link_capacity.unwrap_or(1)
        }
        None => 1,
    };

    let (a, b) = (parse_name(a)?, parse_name(b)?);
    if a == b {
        return Err("connection cannot have same source and destination".into());
    }
    Ok(MapConnection {
        a,
        b,
        max_link_capacity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINEAR: &str = "\
# linear path
nb_drones: 2

start_hub: start 0 0 [color=green]
hub: waypoint1 1 0
hub: waypoint2 2 0 [zone=restricted max_drones=2]
end_hub: goal 3 0 [color=yellow]
connection: start-waypoint1
connection: waypoint1-waypoint2 [max_link_capacity=2]
connection: waypoint2-goal
";

    fn parse_err(text: &str) -> (usize, String) {
        match parse_map(text) {
            Err(MapError::Parse { line, message }) => (line, message),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_linear_map() {
        let map = parse_map(LINEAR).unwrap();
        assert_eq!(map.nb_drones, 2);
        assert_eq!(map.start_hub, "start");
        assert_eq!(map.end_hub, "goal");
        assert_eq!(map.hubs.len(), 4);
        assert_eq!(map.connections.len(), 3);

        let wp2 = map.hub("waypoint2").unwrap();
        assert_eq!(wp2.zone, Zone::Restricted);
        assert_eq!(wp2.max_drones, 2);
        assert_eq!(map.hub("start").unwrap().color.as_deref(), Some("green"));
        assert_eq!(map.connections[1].max_link_capacity, 2);
        assert_eq!(map.connections[0].max_link_capacity, 1);
    }

    #[test]
    fn test_hubs_keep_file_order() {
        let map = parse_map(LINEAR).unwrap();
        let names: Vec<_> = map.hubs.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["start", "waypoint1", "waypoint2", "goal"]);
    }

    #[test]
    fn test_metadata_hub_valid() {
        let meta = parse_metadata("[zone=priority color=green max_drones=3]", Target::Hub).unwrap();
        assert_eq!(meta.zone, Some(Zone::Priority));
        assert_eq!(meta.color.as_deref(), Some("green"));
        assert_eq!(meta.max_drones, Some(3));
    }

    #[test]
    fn test_metadata_empty() {
        assert!(parse_metadata("", Target::Hub).unwrap().is_empty());
        assert!(parse_metadata("[ ]", Target::Hub).unwrap().is_empty());
    }

    #[test]
    fn test_metadata_rejections() {
        let cases = [
            ("zone=normal", Target::Hub, "enclosed in []"),
            ("[zone=normal]", Target::Connection, "not allowed for connection"),
            ("[zone=fast]", Target::Hub, "invalid zone type"),
            ("[max_link_capacity=abc]", Target::Connection, "must be an integer"),
            ("[max_drones=0]", Target::Hub, "must be a positive integer"),
            ("[color=red color=blue]", Target::Hub, "duplicate metadata key"),
            ("[speed=3]", Target::Hub, "unsupported metadata key"),
            ("[color]", Target::Hub, "key=value"),
            ("[color=]", Target::Hub, "non-empty"),
        ];
        for (token, target, expected) in cases {
            let err = parse_metadata(token, target).unwrap_err();
            assert!(err.contains(expected), "{token}: {err}");
        }
    }

    #[test]
    fn test_unknown_color_preserved() {
        let meta = parse_metadata("[color=madeupshade]", Target::Hub).unwrap();
        assert_eq!(meta.color.as_deref(), Some("madeupshade"));
    }

    #[test]
    fn test_nb_drones() {
        assert_eq!(parse_nb_drones("  12  "), Ok(12));
        assert!(parse_nb_drones("abc").unwrap_err().contains("invalid integer"));
        assert!(parse_nb_drones("0").unwrap_err().contains("no drones"));
        assert!(parse_nb_drones("-3").unwrap_err().contains("no drones"));
    }

    #[test]
    fn test_hub_minimal_and_negative_coordinates() {
        let hub = parse_hub("roof1 -3 4", None).unwrap();
        assert_eq!((hub.name.as_str(), hub.x, hub.y), ("roof1", -3, 4));
        assert_eq!(hub.zone, Zone::Normal);
        assert_eq!(hub.color, None);
        assert_eq!(hub.max_drones, 1);
    }

    #[test]
    fn test_hub_rejections() {
        assert!(parse_hub("roof1 3", None).unwrap_err().contains("number of params"));
        assert!(parse_hub("roof-1 3 4", None).unwrap_err().contains("dashes"));
        assert!(parse_hub("roof1 x 4", None).unwrap_err().contains("invalid integer"));
        assert!(parse_hub("s 0 0 [zone=normal]", Some(Zone::Start))
            .unwrap_err()
            .contains("duplicate zones"));
    }

    #[test]
    fn test_connection_parsing() {
        let c = parse_connection("a-b [max_link_capacity=4]").unwrap();
        assert_eq!((c.a.as_str(), c.b.as_str(), c.max_link_capacity), ("a", "b", 4));

        assert!(parse_connection("").unwrap_err().contains("empty"));
        assert!(parse_connection("ab").unwrap_err().contains("no dash"));
        assert!(parse_connection("a-a").unwrap_err().contains("same source"));
        assert!(parse_connection("a-b []").unwrap_err().contains("empty metadata"));
        assert!(parse_connection("a-b-c").unwrap_err().contains("dashes"));
    }

    #[test]
    fn test_line_errors_carry_line_numbers() {
        let (line, msg) = parse_err("nb_drones: 1\n\nstart_hub 0 0");
        assert_eq!(line, 3);
        assert!(msg.contains("':'"));

        let (line, msg) = parse_err("nb_drones: 1\nnb_drones: 2");
        assert_eq!(line, 2);
        assert!(msg.contains("duplicate"));

        let (line, msg) = parse_err("# c\ndrone: x");
        assert_eq!(line, 2);
        assert!(msg.contains("key must be"));
    }

    #[test]
    fn test_missing_directives() {
        match parse_map("nb_drones: 1\nstart_hub: s 0 0") {
            Err(MapError::Missing(which)) => assert_eq!(which, "end_hub"),
            other => panic!("expected missing directive, got {other:?}"),
        }
        match parse_map("") {
            Err(MapError::Missing(which)) => assert_eq!(which, "nb_drones, start_hub, end_hub"),
            other => panic!("expected missing directives, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_hub_name() {
        let text = "nb_drones: 1\nstart_hub: s 0 0\nend_hub: e 1 1\nhub: s 2 2";
        assert!(matches!(parse_map(text), Err(MapError::DuplicateHub(n)) if n == "s"));
    }

    #[test]
    fn test_unknown_connection_endpoint() {
        let text = "nb_drones: 1\nstart_hub: s 0 0\nend_hub: e 1 1\nconnection: s-x";
        assert!(matches!(parse_map(text), Err(MapError::UnknownHub(n)) if n == "x"));
    }
}
