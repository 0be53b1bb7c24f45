use std::fmt;
use std::str::FromStr;

pub const PLAYER_EXECUTABLE: &str = "ProjectXPlayerBeta.exe";
pub const SETTINGS_DIR_NAME: &str = "ClientSettings";
pub const SETTINGS_FILE_NAME: &str = "ClientAppSettings.json";

/// One client generation. Every installed version directory keeps one
/// sub-folder per channel it ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    V2017,
    V2018,
    V2020,
    V2021,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::V2017,
        Channel::V2018,
        Channel::V2020,
        Channel::V2021,
    ];

    /// Channels whose ClientSettings folder takes the FastFlag overlay.
    pub const SETTINGS_CAPABLE: [Channel; 2] = [Channel::V2020, Channel::V2021];

    pub fn year(self) -> &'static str {
        match self {
            Channel::V2017 => "2017",
            Channel::V2018 => "2018",
            Channel::V2020 => "2020",
            Channel::V2021 => "2021",
        }
    }

    pub fn folder_name(self) -> &'static str {
        match self {
            Channel::V2017 => "2017",
            Channel::V2018 => "2018",
            Channel::V2020 => "2020L",
            Channel::V2021 => "2021M",
        }
    }

    // the 2017/2018 players live in a sibling folder with an L suffix,
    // not in the channel folder itself
    pub fn executable_folder(self) -> &'static str {
        match self {
            Channel::V2017 => "2017L",
            Channel::V2018 => "2018L",
            Channel::V2020 => "2020L",
            Channel::V2021 => "2021M",
        }
    }

    pub fn supports_settings(self) -> bool {
        matches!(self, Channel::V2020 | Channel::V2021)
    }

    /// The 2017/2018 players only register as a protocol handler for the
    /// website; the later ones can also start as a standalone app.
    pub fn supports_app_mode(self) -> bool {
        matches!(self, Channel::V2020 | Channel::V2021)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(value: &str) -> Result<Channel, Self::Err> {
        let value = value.trim();
        for channel in Channel::ALL {
            if value.eq_ignore_ascii_case(channel.year())
                || value.eq_ignore_ascii_case(channel.folder_name())
                || value.eq_ignore_ascii_case(channel.executable_folder())
            {
                return Ok(channel);
            }
        }
        Err(format!(
            "Unknown channel '{}' (expected 2017, 2018, 2020 or 2021)",
            value
        ))
    }
}
