//! lightwatch - BLE ambient-light / motion sensor node (nRF52840).
//!
//! Bring-up order: Embassy HAL, status LED, SoftDevice, GATT service,
//! then the BLE task (which starts advertising) and the control loop.
//! Each fatal step runs with the status LED in the error colour, so a
//! failure, panics included, halts with the error colour showing.

#![no_std]
#![no_main]

mod ble;
mod config;
mod control;
mod control_logic;
mod error;
mod led;
mod sensor;
mod setup;
mod state;

use core::convert::Infallible;
use core::mem;

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::saadc::{self, ChannelConfig, Saadc};
use embassy_nrf::bind_interrupts;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use nrf_softdevice::{raw, Softdevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::ble::server::Server;
use crate::ble::{AdvertiseSignal, MotionChannel};
use crate::config::{ACTUATOR_ACTIVE_LOW, DEVICE_NAME, STATUS_ACTIVE_LOW, TOGGLE_DEFAULT_ENABLED};
use crate::control::{BoardIo, BoardLed};
use crate::error::{Error, SetupError};
use crate::led::mapper::ERROR_COLOR;
use crate::led::rgb::RgbLed;
use crate::sensor::Sensors;
use crate::state::NodeContext;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

static NODE: StaticCell<NodeContext> = StaticCell::new();
static SERVER: StaticCell<Server> = StaticCell::new();
static ADVERTISE: AdvertiseSignal = Signal::new();
static MOTION_EDGES: MotionChannel = Channel::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server, ctx: &'static NodeContext) -> ! {
    ble::peripheral::run(sd, server, ctx, &ADVERTISE, &MOTION_EDGES).await
}

#[embassy_executor::task]
async fn control_task(ctx: &'static NodeContext, sensors: Sensors<'static>, io: BoardIo) -> ! {
    control::run(ctx, sensors, io).await
}

/// Park the calling task forever.
pub(crate) async fn park() -> ! {
    loop {
        core::future::pending::<()>().await;
    }
}

/// Show the error colour and stop. Used before the tasks exist.
fn halt(status: &mut BoardLed, err: Error) -> ! {
    match err {
        Error::Setup(step) => error!("failed to {} - halting", step.action()),
        other => error!("{} - halting", other),
    }
    status.show(ERROR_COLOR);
    loop {
        cortex_m::asm::wfe();
    }
}

fn softdevice_config() -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("lightwatch starting");

    // SoftDevice reserves priorities 0, 1 and 4; everything else must sit on 2/3.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);
    interrupt::SAADC.set_priority(Priority::P3);

    // GPIO outputs are infallible on this chip.
    let mut status: BoardLed = RgbLed::new(
        Output::new(p.P0_26, Level::High, OutputDrive::Standard),
        Output::new(p.P0_30, Level::High, OutputDrive::Standard),
        Output::new(p.P0_06, Level::High, OutputDrive::Standard),
        STATUS_ACTIVE_LOW,
    )
    .unwrap_or_else(|never| match never {});
    let actuator: BoardLed = RgbLed::new(
        Output::new(p.P0_02, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_03, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_28, Level::Low, OutputDrive::Standard),
        ACTUATOR_ACTIVE_LOW,
    )
    .unwrap_or_else(|never| match never {});

    // `Softdevice::enable` panics (through panic-probe) if the stack rejects the config.
    let sd = match setup::guarded(&mut status, SetupError::Enable, || {
        Ok::<_, Infallible>(Softdevice::enable(&softdevice_config()))
    }) {
        Ok(sd) => sd,
        Err(e) => halt(&mut status, e),
    };
    info!("{} OK", SetupError::Enable.action());

    let server = setup::guarded(&mut status, SetupError::AddService, || {
        Server::new(sd).map_err(|e| error!("register service: {:?}", e))
    });
    let server: &'static Server = match server {
        Ok(server) => SERVER.init(server),
        Err(e) => halt(&mut status, e),
    };
    if server.sensor.toggle_set(&(TOGGLE_DEFAULT_ENABLED as u8)).is_err() {
        warn!("could not seed toggle mirror");
    }
    info!("{} OK", SetupError::AddService.action());

    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(softdevice_task(sd)));

    let ctx: &'static NodeContext = NODE.init(NodeContext::new(TOGGLE_DEFAULT_ENABLED));
    unwrap!(spawner.spawn(ble_task(sd, server, ctx)));

    let adc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [ChannelConfig::single_ended(p.P0_31)],
    );
    let sensors = Sensors::new(
        adc,
        Input::new(p.P1_11, Pull::Up),
        Input::new(p.P1_12, Pull::None),
    );
    let io = BoardIo {
        server,
        ctx,
        motion_edges: &MOTION_EDGES,
        status,
        actuator,
    };
    unwrap!(spawner.spawn(control_task(ctx, sensors, io)));
}
