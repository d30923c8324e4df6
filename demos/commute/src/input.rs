//! Embedded inputs: a six-node corridor through Mobile, Alabama.
//!
//! ```text
//!   n5 ──────────── n6
//!   │                │
//!   n1 ── n2 ── n3 ── n4 (downtown)
//! ```
//!
//! The northern road is longer but faster; the mall's node is left blank
//! so it gets snapped to the network before the first iteration.

pub const NODES_CSV: &str = "\
id,lat,lon
n1,30.6954,-88.1000
n2,30.6954,-88.0800
n3,30.6954,-88.0600
n4,30.6954,-88.0430
n5,30.7100,-88.0800
n6,30.7100,-88.0430
";

// Two-way roads, one row per direction.
pub const LINKS_CSV: &str = "\
from,to,length_m,freespeed_mps
n1,n2,1900,13.9
n2,n1,1900,13.9
n2,n3,1900,11.1
n3,n2,1900,11.1
n3,n4,1600,11.1
n4,n3,1600,11.1
n2,n5,1600,13.9
n5,n2,1600,13.9
n5,n6,3300,27.8
n6,n5,3300,27.8
n6,n4,1600,13.9
n4,n6,1600,13.9
";

pub const FACILITIES_CSV: &str = "\
id,lat,lon,node,activity_types
office,30.6954,-88.0430,n4,work
mall,30.7101,-88.0799,,shop
";

pub const PLANS_CSV: &str = "\
person,activity_type,mode,node,facility,lat,lon,end_time,max_duration
p1,home,,n1,,,,07:30,
p1,,car,,,,,,
p1,work,,,office,,,,08:30
p1,,car,,,,,,
p1,home,,n1,,,,,
p2,home,,n1,,,,07:45,
p2,,car,,,,,,
p2,work,,,office,,,,08:00
p2,,car,,,,,,
p2,home,,n1,,,,,
p3,home,,n2,,,,08:00,
p3,,bike,,,,,,
p3,work,,,office,,,,08:00
p3,,bike,,,,,,
p3,home,,n2,,,,,
p4,home,,n3,,,,07:15,
p4,,pt,,,,,,
p4,work,,,office,,,,09:00
p4,,pt,,,,,,
p4,home,,n3,,,,,
p5,home,,,,30.6960,-88.0990,09:30,
p5,,car,,,,,,
p5,shop,,,mall,,,,01:30
p5,,car,,,,,,
p5,home,,,,30.6960,-88.0990,,
p6,home,,n2,,,,10:00,
p6,,walk,,,,,,
p6,shop,,,mall,,,,01:00
p6,,walk,,,,,,
p6,home,,n2,,,,,
p7,home,,n5,,,,07:00,
p7,,car,,,,,,
p7,work,,,office,,,,09:00
p7,,car,,,,,,
p7,shop,,,mall,,,,00:45
p7,,car,,,,,,
p7,home,,n5,,,,,
p8,home,,n6,,,,08:15,
p8,,walk,,,,,,
p8,work,,,office,,,,08:00
p8,,walk,,,,,,
p8,home,,n6,,,,,
";

pub const CONFIG_TOML: &str = r#"
[controller]
output_directory = "output/commute"
overwrite_files = "delete_directory_if_exists"
last_iteration = 10
write_plans_interval = 5
write_events_interval = 5

[transit]
use_transit = true

[scoring]
brain_exp_beta = 2.0

[[scoring.activity_params]]
activity_type = "home"
typical_duration = 43200.0

[[scoring.activity_params]]
activity_type = "work"
typical_duration = 28800.0
opening_time = 25200.0
closing_time = 68400.0

[[scoring.activity_params]]
activity_type = "shop"
typical_duration = 3600.0
opening_time = 32400.0
closing_time = 72000.0

[replanning]
max_agent_plan_memory_size = 4

[[replanning.strategies]]
name = "exp_beta"
weight = 0.8

[[replanning.strategies]]
name = "reroute"
weight = 0.2
"#;
