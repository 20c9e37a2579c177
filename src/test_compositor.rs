//! A minimal river stand-in for exercising the Wayland client.
//!
//! It runs a `wayland-server` display on its own thread, advertises the
//! globals a test asks for, answers status requests with fixed values, and
//! records every bind and request it receives.

use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use wayland_server::backend::{ClientData, ClientId, DisconnectReason, GlobalId};
use wayland_server::protocol::{wl_output, wl_seat};
use wayland_server::{
    Client, DataInit, Dispatch, Display, DisplayHandle, GlobalDispatch, New, Resource,
};

mod protocol {
    #![allow(
        dead_code,
        missing_docs,
        non_camel_case_types,
        non_upper_case_globals,
        unused_imports,
        clippy::all
    )]

    use wayland_server;
    use wayland_server::protocol::*;

    pub mod __interfaces {
        use wayland_server::backend as wayland_backend;
        use wayland_server::protocol::__interfaces::*;
        wayland_scanner::generate_interfaces!("./protocols/river-status-unstable-v1.xml");
    }

    use self::__interfaces::*;

    wayland_scanner::generate_server_code!("./protocols/river-status-unstable-v1.xml");
}

use protocol::{zriver_output_status_v1, zriver_seat_status_v1, zriver_status_manager_v1};
use zriver_output_status_v1::ZriverOutputStatusV1;
use zriver_seat_status_v1::ZriverSeatStatusV1;
use zriver_status_manager_v1::ZriverStatusManagerV1;

/// A global to advertise, with its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Global {
    StatusManager(u32),
    Output(u32),
    Seat(u32),
}

enum Command {
    Remove(usize),
    Add(Global),
}

/// Handle to the running fake compositor. Stops the server thread on drop.
pub struct FakeRiver {
    commands: Sender<Command>,
    log: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl FakeRiver {
    /// Start serving `globals` (advertised in this order). Returns the
    /// client end of the socket.
    pub fn start(globals: &[Global]) -> (Self, UnixStream) {
        let (client_end, server_end) = UnixStream::pair().unwrap();
        let (commands, receiver) = mpsc::channel();
        let log = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));

        let globals = globals.to_vec();
        let thread_log = Arc::clone(&log);
        let thread_stop = Arc::clone(&stop);
        let thread = thread::spawn(move || {
            serve(globals, server_end, receiver, thread_log, thread_stop)
        });

        let river = FakeRiver {
            commands,
            log,
            stop,
            thread: Some(thread),
        };
        (river, client_end)
    }

    /// Everything the client asked for so far.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| *r == request).count()
    }

    /// Withdraw the global created from `globals[index]` (or a later `add`).
    pub fn remove(&self, index: usize) {
        self.commands.send(Command::Remove(index)).unwrap();
    }

    pub fn add(&self, global: Global) {
        self.commands.send(Command::Add(global)).unwrap();
    }
}

impl Drop for FakeRiver {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn serve(
    globals: Vec<Global>,
    stream: UnixStream,
    commands: Receiver<Command>,
    log: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
) {
    let mut display = Display::<Compositor>::new().unwrap();
    let mut handle = display.handle();

    let mut ids: Vec<GlobalId> = globals
        .iter()
        .map(|global| create_global(&handle, *global))
        .collect();

    handle
        .insert_client(stream, Arc::new(TestClientData))
        .unwrap();

    let mut state = Compositor {
        log,
        outputs: Vec::new(),
        output_statuses: 0,
    };

    while !stop.load(Ordering::SeqCst) {
        while let Ok(command) = commands.try_recv() {
            match command {
                Command::Remove(index) => handle.remove_global::<Compositor>(ids[index].clone()),
                Command::Add(global) => ids.push(create_global(&handle, global)),
            }
        }

        let _ = display.dispatch_clients(&mut state);
        let _ = display.flush_clients();
        thread::sleep(Duration::from_millis(1));
    }
}

fn create_global(handle: &DisplayHandle, global: Global) -> GlobalId {
    match global {
        Global::StatusManager(version) => {
            handle.create_global::<Compositor, ZriverStatusManagerV1, ()>(version, ())
        }
        Global::Output(version) => {
            handle.create_global::<Compositor, wl_output::WlOutput, ()>(version, ())
        }
        Global::Seat(version) => handle.create_global::<Compositor, wl_seat::WlSeat, ()>(version, ()),
    }
}

struct TestClientData;

impl ClientData for TestClientData {
    fn initialized(&self, _client_id: ClientId) {}

    fn disconnected(&self, _client_id: ClientId, _reason: DisconnectReason) {}
}

struct Compositor {
    log: Arc<Mutex<Vec<String>>>,
    outputs: Vec<wl_output::WlOutput>,
    output_statuses: u32,
}

impl Compositor {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

impl GlobalDispatch<ZriverStatusManagerV1, ()> for Compositor {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &Client,
        resource: New<ZriverStatusManagerV1>,
        _global_data: &(),
        data_init: &mut DataInit<'_, Self>,
    ) {
        let manager = data_init.init(resource, ());
        state.record(format!("bind zriver_status_manager_v1 v{}", manager.version()));
    }
}

impl GlobalDispatch<wl_output::WlOutput, ()> for Compositor {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &Client,
        resource: New<wl_output::WlOutput>,
        _global_data: &(),
        data_init: &mut DataInit<'_, Self>,
    ) {
        let output = data_init.init(resource, ());
        state.record(format!("bind wl_output v{}", output.version()));
        state.outputs.push(output);
    }
}

impl GlobalDispatch<wl_seat::WlSeat, ()> for Compositor {
    fn bind(
        state: &mut Self,
        _handle: &DisplayHandle,
        _client: &Client,
        resource: New<wl_seat::WlSeat>,
        _global_data: &(),
        data_init: &mut DataInit<'_, Self>,
    ) {
        let seat = data_init.init(resource, ());
        state.record(format!("bind wl_seat v{}", seat.version()));
    }
}

impl Dispatch<ZriverStatusManagerV1, ()> for Compositor {
    fn request(
        state: &mut Self,
        _client: &Client,
        _resource: &ZriverStatusManagerV1,
        request: zriver_status_manager_v1::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        data_init: &mut DataInit<'_, Self>,
    ) {
        use zriver_status_manager_v1::Request as R;

        match request {
            R::GetRiverOutputStatus { id, output: _ } => {
                state.record("get_river_output_status".to_string());
                let status = data_init.init(id, ());

                // Each new output status reports a different focused tag.
                let focused = 1 << state.output_statuses;
                state.output_statuses += 1;

                status.focused_tags(focused);
                status.view_tags(vec![0; 4]);
                if status.version() >= 2 {
                    status.urgent_tags(0b100);
                }
                if status.version() >= 4 {
                    status.layout_name("rivertile".to_string());
                }
            }
            R::GetRiverSeatStatus { id, seat: _ } => {
                state.record("get_river_seat_status".to_string());
                let status = data_init.init(id, ());

                if let Some(output) = state.outputs.last() {
                    status.focused_output(output);
                }
                status.focused_view("vim".to_string());
                if status.version() >= 3 {
                    status.mode("normal".to_string());
                }
            }
            R::Destroy => state.record("zriver_status_manager_v1.destroy".to_string()),
            _ => {}
        }
    }
}

impl Dispatch<ZriverOutputStatusV1, ()> for Compositor {
    fn request(
        state: &mut Self,
        _client: &Client,
        _resource: &ZriverOutputStatusV1,
        request: zriver_output_status_v1::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, Self>,
    ) {
        if let zriver_output_status_v1::Request::Destroy = request {
            state.record("zriver_output_status_v1.destroy".to_string());
        }
    }
}

impl Dispatch<ZriverSeatStatusV1, ()> for Compositor {
    fn request(
        _state: &mut Self,
        _client: &Client,
        _resource: &ZriverSeatStatusV1,
        _request: zriver_seat_status_v1::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, Self>,
    ) {
    }
}

impl Dispatch<wl_output::WlOutput, ()> for Compositor {
    fn request(
        state: &mut Self,
        _client: &Client,
        resource: &wl_output::WlOutput,
        request: wl_output::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, Self>,
    ) {
        if let wl_output::Request::Release = request {
            state.record("wl_output.release".to_string());
            state.outputs.retain(|output| output != resource);
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for Compositor {
    fn request(
        _state: &mut Self,
        _client: &Client,
        _resource: &wl_seat::WlSeat,
        _request: wl_seat::Request,
        _data: &(),
        _dhandle: &DisplayHandle,
        _data_init: &mut DataInit<'_, Self>,
    ) {
    }
}
