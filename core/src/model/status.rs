use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Safe,
    Nsfw,
    Error,
    #[default]
    NoData,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Safe, Status::Nsfw, Status::Error, Status::NoData];

    /// Display label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Safe => "سالم",
            Status::Nsfw => "نامناسب",
            Status::Error => "خطا",
            Status::NoData => "بدون داده",
        }
    }

    /// Visual class, identical to the wire name.
    pub fn class(&self) -> &'static str {
        match self {
            Status::Safe => "safe",
            Status::Nsfw => "nsfw",
            Status::Error => "error",
            Status::NoData => "no_data",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.class() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class())
    }
}

/// Label for a raw status string; unrecognized values are shown verbatim.
pub fn status_label(raw: &str) -> &str {
    match raw.parse::<Status>() {
        Ok(status) => status.label(),
        Err(_) => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table() {
        assert_eq!(status_label("safe"), "سالم");
        assert_eq!(status_label("nsfw"), "نامناسب");
        assert_eq!(status_label("error"), "خطا");
        assert_eq!(status_label("no_data"), "بدون داده");
    }

    #[test]
    fn test_unknown_status_falls_back_to_raw() {
        assert_eq!(status_label("blurry"), "blurry");
        assert_eq!(status_label(""), "");
    }

    #[test]
    fn test_wire_names() {
        let parsed: Status = serde_json::from_str("\"no_data\"").unwrap();
        assert_eq!(parsed, Status::NoData);
        assert_eq!(serde_json::to_string(&Status::Nsfw).unwrap(), "\"nsfw\"");
        assert!(serde_json::from_str::<Status>("\"NSFW\"").is_err());
    }

    #[test]
    fn test_default_is_no_data() {
        assert_eq!(Status::default(), Status::NoData);
    }
}
