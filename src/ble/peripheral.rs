//! Advertising / connection task.
//!
//! Waits for the tracker to request advertising, advertises connectably
//! until a central connects, then serves GATT and forwards motion edges
//! until the link drops.  The disconnect transition re-raises the
//! advertise signal, so the loop never parks between connections.

use defmt::{debug, error, info, warn};
use embassy_futures::select::{select, Either};
use nrf_softdevice::ble::advertisement_builder::{
    Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
};
use nrf_softdevice::ble::{gatt_server, peripheral, Connection};
use nrf_softdevice::Softdevice;

use crate::ble::command::Command;
use crate::ble::server::{SensorServiceEvent, Server, ServerEvent};
use crate::ble::{AdvertiseSignal, MotionChannel, SignalAdvertiser};
use crate::config::{BLE_ADV_INTERVAL, DEVICE_NAME, SENSOR_SERVICE_UUID};
use crate::error::{Error, SetupError};
use crate::state::NodeContext;

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .full_name(DEVICE_NAME)
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_128(ServiceList::Complete, &[SENSOR_SERVICE_UUID.to_le_bytes()])
    .build();

pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    ctx: &'static NodeContext,
    advertise: &'static AdvertiseSignal,
    motion_edges: &'static MotionChannel,
) -> ! {
    let radio = SignalAdvertiser(advertise);
    let config = peripheral::Config {
        interval: BLE_ADV_INTERVAL,
        ..Default::default()
    };

    ctx.connection.start_advertising(&radio);

    loop {
        advertise.wait().await;
        info!("advertising as {}", DEVICE_NAME);

        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                error!(
                    "failed to {}: {:?}",
                    SetupError::StartAdvertisement.action(),
                    e
                );
                ctx.fail(SetupError::StartAdvertisement);
                crate::park().await
            }
        };

        if !ctx.connection.on_connect() {
            warn!("connect while {}", ctx.connection.state());
        }
        info!("central connected");

        // Edges queued before this link are stale for the new peer.
        motion_edges.clear();

        let events = gatt_server::run(&conn, server, |event| on_server_event(ctx, event));
        let notifier = forward_motion(&conn, server, motion_edges);
        if let Either::First(reason) = select(events, notifier).await {
            info!("central disconnected: {:?}", reason);
        }

        if !ctx.connection.on_disconnect(&radio) {
            warn!("disconnect while {} - restarting advertising", ctx.connection.state());
            ctx.connection.start_advertising(&radio);
        }
    }
}

/// Write callback. Runs to completion without awaiting.
fn on_server_event(ctx: &NodeContext, event: ServerEvent) {
    match event {
        ServerEvent::Control(Command::Invalid) => {
            debug!("control write dropped (invalid)");
        }
        ServerEvent::Control(command) => {
            if ctx.toggle.apply(command) {
                info!("toggle -> {}", ctx.toggle.enabled());
            } else {
                debug!("control write {} matches current toggle", command);
            }
        }
        ServerEvent::Sensor(SensorServiceEvent::MotionCccdWrite { notifications }) => {
            info!("motion notifications: {}", notifications);
        }
        // Control writes are decoded raw in `Server::on_write`.
        ServerEvent::Sensor(SensorServiceEvent::ControlWrite(_)) => {}
    }
}

async fn forward_motion(conn: &Connection, server: &Server, motion_edges: &MotionChannel) {
    loop {
        let edge = motion_edges.receive().await;
        let value = edge.notify_byte();
        if let Err(e) = server.sensor.motion_set(&value) {
            warn!("motion_set: {:?}", e);
        }
        match server.sensor.motion_notify(conn, &value) {
            Ok(()) => debug!("notified motion {}", edge),
            Err(e) => warn!("{}: {:?}", Error::Notify, e),
        }
    }
}
