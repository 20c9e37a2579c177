//! Wayland side of flow: connecting to river and feeding [`RiverState`].

use anyhow::{Context, Result};
use log::{debug, info, warn};
use wayland_client::{
    delegate_noop,
    protocol::{wl_output, wl_registry, wl_seat},
    Connection, Dispatch, EventQueue, Proxy, QueueHandle,
};

use crate::error::ClientError;
use crate::protocol::{zriver_output_status_v1, zriver_seat_status_v1, zriver_status_manager_v1};
use crate::state::{OutputUpdate, RiverState, SeatUpdate};
use crate::watch::StatusSource;

use zriver_output_status_v1::ZriverOutputStatusV1;
use zriver_seat_status_v1::ZriverSeatStatusV1;
use zriver_status_manager_v1::ZriverStatusManagerV1;

const WL_OUTPUT_VERSION: u32 = 4;
const WL_SEAT_VERSION: u32 = 4;
const STATUS_MANAGER_VERSION: u32 = 4;

/// The `wl_output` whose tags and layout are reported, with its global name.
#[derive(Debug)]
struct TrackedOutput {
    name: u32,
    output: wl_output::WlOutput,
}

/// Dispatch target for the event queue: bound globals plus the data model.
#[derive(Debug, Default)]
struct Client {
    status_manager: Option<ZriverStatusManagerV1>,
    output: Option<TrackedOutput>,
    seat: Option<wl_seat::WlSeat>,
    output_status: Option<ZriverOutputStatusV1>,
    seat_status: Option<ZriverSeatStatusV1>,

    /// Advertised outputs not tracked yet, as `(name, version)`.
    spare_outputs: Vec<(u32, u32)>,

    state: RiverState,
}

impl Client {
    fn bind_output(
        &mut self,
        registry: &wl_registry::WlRegistry,
        name: u32,
        version: u32,
        qh: &QueueHandle<Self>,
    ) {
        debug!("Tracking wl_output {}", name);
        let output = registry.bind::<wl_output::WlOutput, _, _>(
            name,
            version.min(WL_OUTPUT_VERSION),
            qh,
            (),
        );
        self.output = Some(TrackedOutput { name, output });
    }

    /// Ask for status objects once both the manager and their target exist.
    fn request_statuses(&mut self, qh: &QueueHandle<Self>) {
        let Some(manager) = &self.status_manager else {
            return;
        };

        if self.output_status.is_none() {
            if let Some(tracked) = &self.output {
                debug!("Requesting river output status");
                self.output_status =
                    Some(manager.get_river_output_status(&tracked.output, qh, ()));
            }
        }

        if self.seat_status.is_none() {
            if let Some(seat) = &self.seat {
                debug!("Requesting river seat status");
                self.seat_status = Some(manager.get_river_seat_status(seat, qh, ()));
            }
        }
    }

    /// Handle a global going away. Losing the tracked output drops its
    /// status and moves on to the next advertised output, if any.
    fn remove_global(
        &mut self,
        registry: &wl_registry::WlRegistry,
        name: u32,
        qh: &QueueHandle<Self>,
    ) {
        self.spare_outputs.retain(|(spare, _)| *spare != name);

        if self.output.as_ref().map(|tracked| tracked.name) != Some(name) {
            return;
        }

        info!("Tracked wl_output {} was removed", name);
        if let Some(status) = self.output_status.take() {
            status.destroy();
        }
        if let Some(tracked) = self.output.take() {
            if tracked.output.version() >= 3 {
                tracked.output.release();
            }
        }
        self.state.clear_output();

        if !self.spare_outputs.is_empty() {
            let (next, version) = self.spare_outputs.remove(0);
            self.bind_output(registry, next, version, qh);
            self.request_statuses(qh);
        }
    }
}

delegate_noop!(Client: ignore ZriverStatusManagerV1);
delegate_noop!(Client: ignore wl_output::WlOutput);
delegate_noop!(Client: ignore wl_seat::WlSeat);

impl Dispatch<wl_registry::WlRegistry, ()> for Client {
    fn event(
        client: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        let (name, interface, version) = match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => (name, interface, version),
            wl_registry::Event::GlobalRemove { name } => {
                client.remove_global(registry, name, qh);
                return;
            }
            _ => return,
        };

        match interface.as_str() {
            "wl_output" => {
                if client.output.is_some() {
                    debug!("Keeping additional wl_output {} in reserve", name);
                    client.spare_outputs.push((name, version));
                    return;
                }
                client.bind_output(registry, name, version, qh);
            }
            "wl_seat" => {
                if client.seat.is_some() {
                    debug!("Ignoring additional wl_seat {}", name);
                    return;
                }
                let seat = registry.bind::<wl_seat::WlSeat, _, _>(
                    name,
                    version.min(WL_SEAT_VERSION),
                    qh,
                    (),
                );
                client.seat = Some(seat);
            }
            "zriver_status_manager_v1" => {
                if version < STATUS_MANAGER_VERSION {
                    warn!(
                        "river status manager version {} is older than {}, some fields may never arrive",
                        version, STATUS_MANAGER_VERSION
                    );
                }
                let manager = registry.bind::<ZriverStatusManagerV1, _, _>(
                    name,
                    version.min(STATUS_MANAGER_VERSION),
                    qh,
                    (),
                );
                client.status_manager = Some(manager);
            }
            _ => return,
        }

        client.request_statuses(qh);
    }
}

impl Dispatch<ZriverOutputStatusV1, ()> for Client {
    fn event(
        client: &mut Self,
        _: &ZriverOutputStatusV1,
        event: zriver_output_status_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        use zriver_output_status_v1::Event as E;

        let update = match event {
            E::FocusedTags { tags } => OutputUpdate::FocusedTags(tags),
            E::UrgentTags { tags } => OutputUpdate::UrgentTags(tags),
            E::LayoutName { name } => OutputUpdate::LayoutName(name),
            E::LayoutNameClear => OutputUpdate::LayoutNameClear,
            _ => return,
        };

        client.state.apply_output(update);
    }
}

impl Dispatch<ZriverSeatStatusV1, ()> for Client {
    fn event(
        client: &mut Self,
        _: &ZriverSeatStatusV1,
        event: zriver_seat_status_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        use zriver_seat_status_v1::Event as E;

        let update = match event {
            E::FocusedView { title } => SeatUpdate::FocusedView(title),
            E::Mode { name } => SeatUpdate::Mode(name),
            _ => return,
        };

        client.state.apply_seat(update);
    }
}

/// A live connection to river.
pub struct RiverSource {
    // Keeps the socket alive for the lifetime of the queue.
    _conn: Connection,
    queue: EventQueue<Client>,
    client: Client,
}

impl RiverSource {
    /// Connect using `WAYLAND_DISPLAY` and collect the initial status.
    #[tracing::instrument]
    pub fn connect() -> Result<Self> {
        let conn = Connection::connect_to_env()
            .context("failed to connect to the Wayland compositor")?;
        Self::with_connection(conn)
    }

    #[tracing::instrument(skip(conn))]
    pub fn with_connection(conn: Connection) -> Result<Self> {
        let mut queue = conn.new_event_queue();
        let qh = queue.handle();
        conn.display().get_registry(&qh, ());

        let mut client = Client::default();

        // Registry globals are bound during this roundtrip.
        queue
            .roundtrip(&mut client)
            .context("failed to read Wayland globals")?;

        if client.status_manager.is_none() {
            return Err(ClientError::UnsupportedCompositor.into());
        }
        if client.seat.is_none() {
            return Err(ClientError::NoSeat.into());
        }
        if client.output.is_none() {
            warn!("No wl_output advertised yet, waiting for one");
        }

        // river answers the status requests with the current state.
        queue
            .roundtrip(&mut client)
            .context("failed to read initial river status")?;
        client.state.mark_changed();

        debug!("Initial state: {:?}", client.state);

        Ok(Self {
            _conn: conn,
            queue,
            client,
        })
    }
}

impl StatusSource for RiverSource {
    fn next_change(&mut self) -> Result<RiverState> {
        while !self.client.state.take_changed() {
            self.queue
                .blocking_dispatch(&mut self.client)
                .context("lost connection to the compositor")?;
        }
        Ok(self.client.state.clone())
    }
}
