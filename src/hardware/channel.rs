use std::io::{ErrorKind, Read, Write};
use std::thread;

use log::{info, warn};
use strum_macros::Display;

use crate::angles::ServoAngles;
use crate::config::SerialConfig;
use crate::geometry::ObserverLocation;
use crate::hardware::protocol;

/// Link lifecycle. `NonPort` is permanent for the session: once entered,
/// commands become log echoes and nothing attempts to reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LinkState {
    Disconnected,
    Connected,
    NonPort,
}

pub(crate) trait LinkIo: Read + Write + Send {}

impl<T: Read + Write + Send> LinkIo for T {}

/// Serial command channel to the pointer controller.
///
/// Every failure mode degrades instead of erroring: tracking must keep
/// running with or without the hardware attached.
pub struct HardwareChannel {
    config: SerialConfig,
    state: LinkState,
    link: Option<Box<dyn LinkIo>>,
}

impl HardwareChannel {
    pub fn new(config: SerialConfig) -> Self {
        Self {
            config,
            state: LinkState::Disconnected,
            link: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_link(config: SerialConfig, link: Box<dyn LinkIo>) -> Self {
        Self {
            config,
            state: LinkState::Connected,
            link: Some(link),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Opens the serial port. Success waits out the controller's boot
    /// settle time; failure drops straight to non-port mode for the rest
    /// of the session.
    pub fn connect(&mut self) -> LinkState {
        match serialport::new(self.config.port.as_str(), self.config.baud)
            .timeout(self.config.timeout)
            .open()
        {
            Ok(port) => {
                thread::sleep(self.config.settle);
                info!("Connected to controller on {}", self.config.port);
                self.link = Some(Box::new(port));
                self.state = LinkState::Connected;
            }
            Err(e) => {
                warn!(
                    "Could not open {}: {}. Running in non-port mode.",
                    self.config.port, e
                );
                self.state = LinkState::NonPort;
            }
        }
        self.state
    }

    /// Commands the mount. Returns false only when a write failed and the
    /// command was lost; there is no retry.
    pub fn move_servos(&mut self, angles: ServoAngles) -> bool {
        self.send(&protocol::servo_frame(angles))
    }

    pub fn update_lcd(&mut self, angles: ServoAngles, visible: bool) -> bool {
        self.send(&protocol::lcd_frame(angles, visible))
    }

    pub fn init_lcd(&mut self) -> bool {
        self.send(protocol::lcd_init_frame())
    }

    /// One-shot GPS read-back: reads a single line from the controller and
    /// parses a `Latitude <lat> ... <lon>` report. No link, a timeout, an
    /// unrecognized line, and the no-fix sentinel all yield `None`.
    pub fn read_observer_location(&mut self) -> Option<ObserverLocation> {
        if self.state != LinkState::Connected {
            return None;
        }
        match self.read_line() {
            Ok(line) => protocol::parse_gps_line(&line),
            Err(e) => {
                warn!("GPS read failed: {}. Running in non-port mode.", e);
                self.degrade();
                None
            }
        }
    }

    /// Closes the link. Idempotent; close errors cannot surface because
    /// dropping the port is the close.
    pub fn close(&mut self) {
        if self.state == LinkState::Connected {
            if self.link.take().is_some() {
                info!("Serial connection closed");
            }
            self.state = LinkState::Disconnected;
        }
    }

    /// Sends one command frame. In non-port mode (and before any connect)
    /// the frame is echoed to the log and treated as delivered, so the
    /// tracking pipeline behaves identically with or without hardware.
    fn send(&mut self, frame: &str) -> bool {
        if self.state == LinkState::Connected {
            if let Some(link) = self.link.as_mut() {
                return match link.write_all(frame.as_bytes()) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Serial write failed: {}. Running in non-port mode.", e);
                        self.degrade();
                        false
                    }
                };
            }
        }
        info!("[non-port] {}", frame.trim_end());
        true
    }

    fn degrade(&mut self) {
        self.state = LinkState::NonPort;
        self.link = None;
    }

    fn read_line(&mut self) -> std::io::Result<String> {
        let mut buf = Vec::new();
        if let Some(link) = self.link.as_mut() {
            let mut byte = [0u8; 1];
            loop {
                match link.read(&mut byte) {
                    Ok(0) => break,
                    Ok(_) => {
                        if byte[0] == b'\n' {
                            break;
                        }
                        buf.push(byte[0]);
                        // GPS report lines are short
                        if buf.len() >= 256 {
                            break;
                        }
                    }
                    // A silent controller is not a fault, just no fix yet.
                    Err(e) if e.kind() == ErrorKind::TimedOut => break,
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::scripted::ScriptedLink;

    fn connected(link: ScriptedLink) -> HardwareChannel {
        HardwareChannel::with_link(SerialConfig::default(), Box::new(link))
    }

    #[test]
    fn connected_channel_writes_frames() {
        let link = ScriptedLink::new();
        let written = link.written();
        let mut channel = connected(link);

        assert!(channel.init_lcd());
        assert!(channel.move_servos(ServoAngles {
            azimuth: 90,
            altitude: 45
        }));
        assert_eq!(
            ScriptedLink::written_text(&written),
            "LCD_INIT\nSERVO,90,45\n"
        );
    }

    #[test]
    fn write_failure_degrades_permanently() {
        let link = ScriptedLink::new().failing_after(1);
        let written = link.written();
        let mut channel = connected(link);

        assert!(channel.move_servos(ServoAngles {
            azimuth: 10,
            altitude: 10
        }));
        // This write fails and the command is lost.
        assert!(!channel.move_servos(ServoAngles {
            azimuth: 20,
            altitude: 20
        }));
        assert_eq!(channel.state(), LinkState::NonPort);

        // Later commands are echoes, not writes.
        assert!(channel.update_lcd(ServoAngles::rest(), false));
        assert_eq!(channel.state(), LinkState::NonPort);
        assert_eq!(ScriptedLink::written_text(&written), "SERVO,10,10\n");
    }

    #[test]
    fn commands_before_connect_are_echoed() {
        let mut channel = HardwareChannel::new(SerialConfig::default());
        assert_eq!(channel.state(), LinkState::Disconnected);
        assert!(channel.move_servos(ServoAngles {
            azimuth: 1,
            altitude: 2
        }));
        assert_eq!(channel.state(), LinkState::Disconnected);
    }

    #[test]
    fn gps_read_back_parses_the_fix() {
        let link = ScriptedLink::new().with_read("Latitude 17.39 Longitude 78.32\n");
        let mut channel = connected(link);
        let observer = channel.read_observer_location().unwrap();
        assert_eq!(observer.latitude_deg, 17.39);
        assert_eq!(observer.longitude_deg, 78.32);
        assert_eq!(channel.state(), LinkState::Connected);
    }

    #[test]
    fn gps_read_back_without_a_fix_is_none() {
        let link = ScriptedLink::new().with_read("Latitude 0.0 Longitude 0.0\n");
        let mut channel = connected(link);
        assert!(channel.read_observer_location().is_none());
        // An unrecognized answer is not an I/O fault.
        assert_eq!(channel.state(), LinkState::Connected);
    }

    #[test]
    fn gps_read_back_in_non_port_mode_is_none() {
        let mut channel = HardwareChannel::new(SerialConfig::default());
        assert!(channel.read_observer_location().is_none());
    }

    #[test]
    fn close_is_idempotent() {
        let link = ScriptedLink::new();
        let written = link.written();
        let mut channel = connected(link);

        channel.close();
        assert_eq!(channel.state(), LinkState::Disconnected);
        channel.close();
        assert_eq!(channel.state(), LinkState::Disconnected);

        // A command after close is an echo, not a write.
        assert!(channel.move_servos(ServoAngles::rest()));
        assert_eq!(ScriptedLink::written_text(&written), "");
    }

    #[test]
    fn link_states_format_for_logs() {
        assert_eq!(LinkState::NonPort.to_string(), "NonPort");
        assert_eq!(LinkState::Connected.to_string(), "Connected");
    }
}
