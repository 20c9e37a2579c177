//! Client bindings for `river-status-unstable-v1`, generated from the
//! vendored protocol description in `protocols/`.

#![allow(
    dead_code,
    missing_docs,
    non_camel_case_types,
    non_upper_case_globals,
    unused_imports,
    clippy::all
)]

pub mod river_status {
    use wayland_client;
    use wayland_client::protocol::*;

    pub mod __interfaces {
        use wayland_client::backend as wayland_backend;
        use wayland_client::protocol::__interfaces::*;
        wayland_scanner::generate_interfaces!("./protocols/river-status-unstable-v1.xml");
    }

    use self::__interfaces::*;

    wayland_scanner::generate_client_code!("./protocols/river-status-unstable-v1.xml");
}

pub use river_status::{zriver_output_status_v1, zriver_seat_status_v1, zriver_status_manager_v1};
