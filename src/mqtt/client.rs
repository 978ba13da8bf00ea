use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use crossbeam_channel::Sender;
use dotenv::dotenv;
use log::{debug, info, warn, error};
use rumqttc::{Client, ConnectReturnCode, Event, LastWill, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::types::{parse_command, parse_frame, LandmarkFrame, SessionCommand};

/// Forwards landmark frames and control commands from the broker to the main
/// loop. Parsing happens here; nothing on this thread touches session state.
pub fn run_mqtt_client(
    config: MqttConfig,
    frame_sender: Sender<LandmarkFrame>,
    control_sender: Sender<SessionCommand>,
    shutdown_signal: Arc<AtomicBool>
) -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // 加载 .env 文件

    // 环境变量优先于配置文件
    let mqtt_host = env::var("MQTT_HOST").unwrap_or(config.broker);
    let mqtt_port = match env::var("MQTT_PORT") {
        Ok(port) => port.parse::<u16>()?,
        Err(_) => config.port,
    };

    info!("Connecting to MQTT broker {}:{}", mqtt_host, mqtt_port);

    let mut mqtt_options = MqttOptions::new(
        config.client_id,
        mqtt_host,
        mqtt_port
    );

    if let (Ok(mqtt_user), Ok(mqtt_pass)) = (env::var("MQTT_USER"), env::var("MQTT_PASS")) {
        mqtt_options
            .set_credentials(mqtt_user, mqtt_pass);
    }

    let topics = config.topics;
    mqtt_options
        .set_keep_alive(Duration::from_secs(config.keep_alive as u64))
        .set_last_will(LastWill::new(
            topics.status.clone(),
            "offline",
            QoS::AtLeastOnce,
            true,
        ));

    let (client, mut connection) = Client::new(mqtt_options, 10);
    client.subscribe(topics.landmarks.as_str(), QoS::AtMostOnce)?;
    client.subscribe(topics.control.as_str(), QoS::AtLeastOnce)?;

    for event in connection.iter() {
        // 检查关闭信号
        if shutdown_signal.load(Ordering::Relaxed) {
            info!("MQTT thread received shutdown signal, exiting gracefully");
            break;
        }

        match event {
            Ok(Event::Incoming(Packet::ConnAck(ack))) if ack.code == ConnectReturnCode::Success => {
                info!("MQTT connected, listening on {} and {}", topics.landmarks, topics.control);
                if let Err(e) = client.try_publish(topics.status.as_str(), QoS::AtLeastOnce, true, "online") {
                    warn!("Failed to publish online status: {}", e);
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topics.landmarks => {
                match parse_frame(&publish.payload) {
                    Ok(frame) => {
                        if let Err(_e) = frame_sender.send(frame) {
                            // 通道断开表示主循环已退出
                            info!("Frame channel disconnected, MQTT thread exiting");
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid landmark frame: {}", e),
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) if publish.topic == topics.control => {
                match parse_command(&publish.payload) {
                    Ok(command) => {
                        debug!("Control command: {:?}", command);
                        if let Err(_e) = control_sender.send(command) {
                            info!("Control channel disconnected, MQTT thread exiting");
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid control command: {}", e),
                }
            }
            Ok(Event::Incoming(_)) => {}
            Err(e) => {
                error!("MQTT connection error: {}", e);
                return Err(e.into());
            }
            _ => {}
        }
    }

    Ok(())
}
