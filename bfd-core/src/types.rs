//! Protocol enums and constants for BFD (RFC 5880)

use std::fmt;
use std::str::FromStr;

/// UDP destination port for single-hop control packets (RFC 5881)
pub const BFD_CONTROL_PORT: u16 = 3784;

/// UDP destination port for echo packets (RFC 5881)
pub const BFD_ECHO_PORT: u16 = 3785;

/// UDP destination port for multihop control packets (RFC 5883)
pub const BFD_MULTIHOP_CONTROL_PORT: u16 = 4784;

/// The only protocol version accepted on receive
pub const BFD_VERSION: u8 = 1;

/// Size of the fixed control header in bytes
pub const BFD_HEADER_LEN: usize = 24;

/// Smallest packet that can carry an authentication section
pub const BFD_MIN_AUTH_PACKET_LEN: usize = 26;

/// Session state carried in every control packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BfdState {
    AdminDown = 0,
    #[default]
    Down = 1,
    Init = 2,
    Up = 3,
}

impl BfdState {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Map the two-bit state field; only the low two bits are looked at
    pub fn from_bits(val: u8) -> Self {
        match val & 0x03 {
            0 => BfdState::AdminDown,
            1 => BfdState::Down,
            2 => BfdState::Init,
            _ => BfdState::Up,
        }
    }

    /// AdminDown and Down are the states in which a peer may not yet know
    /// our discriminator
    pub fn is_down(self) -> bool {
        matches!(self, BfdState::AdminDown | BfdState::Down)
    }
}

impl fmt::Display for BfdState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BfdState::AdminDown => "AdminDown",
            BfdState::Down => "Down",
            BfdState::Init => "Init",
            BfdState::Up => "Up",
        };
        f.write_str(name)
    }
}

impl FromStr for BfdState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admindown" | "admin-down" | "0" => Ok(BfdState::AdminDown),
            "down" | "1" => Ok(BfdState::Down),
            "init" | "2" => Ok(BfdState::Init),
            "up" | "3" => Ok(BfdState::Up),
            _ => Err(crate::Error::invalid_parameter(
                "state",
                "expected admindown, down, init or up",
            )),
        }
    }
}

/// Diagnostic codes defined by RFC 5880 section 4.1
///
/// The wire field is five bits wide; values above 8 are reserved and are
/// carried through as raw numbers by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BfdDiagnostic {
    None = 0,
    ControlDetectionTimeExpired = 1,
    EchoFunctionFailed = 2,
    NeighborSignaledSessionDown = 3,
    ForwardingPlaneReset = 4,
    PathDown = 5,
    ConcatenatedPathDown = 6,
    AdministrativelyDown = 7,
    ReverseConcatenatedPathDown = 8,
}

impl BfdDiagnostic {
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(BfdDiagnostic::None),
            1 => Some(BfdDiagnostic::ControlDetectionTimeExpired),
            2 => Some(BfdDiagnostic::EchoFunctionFailed),
            3 => Some(BfdDiagnostic::NeighborSignaledSessionDown),
            4 => Some(BfdDiagnostic::ForwardingPlaneReset),
            5 => Some(BfdDiagnostic::PathDown),
            6 => Some(BfdDiagnostic::ConcatenatedPathDown),
            7 => Some(BfdDiagnostic::AdministrativelyDown),
            8 => Some(BfdDiagnostic::ReverseConcatenatedPathDown),
            _ => None,
        }
    }
}

impl fmt::Display for BfdDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BfdDiagnostic::None => "No Diagnostic",
            BfdDiagnostic::ControlDetectionTimeExpired => "Control Detection Time Expired",
            BfdDiagnostic::EchoFunctionFailed => "Echo Function Failed",
            BfdDiagnostic::NeighborSignaledSessionDown => "Neighbor Signaled Session Down",
            BfdDiagnostic::ForwardingPlaneReset => "Forwarding Plane Reset",
            BfdDiagnostic::PathDown => "Path Down",
            BfdDiagnostic::ConcatenatedPathDown => "Concatenated Path Down",
            BfdDiagnostic::AdministrativelyDown => "Administratively Down",
            BfdDiagnostic::ReverseConcatenatedPathDown => "Reverse Concatenated Path Down",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_conversion() {
        assert_eq!(BfdState::AdminDown.to_u8(), 0);
        assert_eq!(BfdState::Down.to_u8(), 1);
        assert_eq!(BfdState::Init.to_u8(), 2);
        assert_eq!(BfdState::Up.to_u8(), 3);

        for val in 0..4u8 {
            assert_eq!(BfdState::from_bits(val).to_u8(), val);
        }
        // Upper bits are ignored
        assert_eq!(BfdState::from_bits(0xFF), BfdState::Up);
    }

    #[test]
    fn test_state_is_down() {
        assert!(BfdState::AdminDown.is_down());
        assert!(BfdState::Down.is_down());
        assert!(!BfdState::Init.is_down());
        assert!(!BfdState::Up.is_down());
    }

    #[test]
    fn test_state_from_str() {
        assert_eq!("up".parse::<BfdState>().unwrap(), BfdState::Up);
        assert_eq!("AdminDown".parse::<BfdState>().unwrap(), BfdState::AdminDown);
        assert_eq!("2".parse::<BfdState>().unwrap(), BfdState::Init);
        assert!("sideways".parse::<BfdState>().is_err());
    }

    #[test]
    fn test_diagnostic_conversion() {
        for val in 0..=8u8 {
            let diag = BfdDiagnostic::from_u8(val).unwrap();
            assert_eq!(diag.to_u8(), val);
        }
        for val in 9..32u8 {
            assert_eq!(BfdDiagnostic::from_u8(val), None);
        }
        assert_eq!(BfdDiagnostic::PathDown.to_string(), "Path Down");
    }

    #[test]
    fn test_constants() {
        assert_eq!(BFD_CONTROL_PORT, 3784);
        assert_eq!(BFD_ECHO_PORT, 3785);
        assert_eq!(BFD_MULTIHOP_CONTROL_PORT, 4784);
        assert_eq!(BFD_HEADER_LEN, 24);
        assert_eq!(BFD_MIN_AUTH_PACKET_LEN, 26);
    }
}
