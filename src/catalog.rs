//! Application catalog: presets, browsers and antivirus options.
//!
//! Package lists are kept in Rust enums so every menu entry maps to exactly
//! one list and can be checked without running winget.
//!
//! # Note
//!
//! The winget identifiers are illustrative. Some vendors (Office, Bitdefender)
//! publish under different ids per region or only through the Store, so an
//! install may fail even though the entry is listed here. A failed entry is
//! logged and skipped like any other failure.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Use-case bundle of winget packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Preset {
    #[strum(serialize = "Gamer")]
    Gamer,
    #[strum(serialize = "Developer")]
    Developer,
    #[strum(serialize = "Secondary PC")]
    SecondaryPc,
    #[strum(serialize = "Streamer / Content Creator")]
    Streamer,
    #[strum(serialize = "Productivity / School")]
    Productivity,
    #[strum(serialize = "Clean Minimalist")]
    CleanMinimalist,
    #[strum(serialize = "Work / Corporate")]
    Work,
    #[strum(serialize = "Kids / Family Mode")]
    Family,
}

impl Preset {
    /// Packages for this preset, in install order.
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            Preset::Gamer => &["Valve.Steam", "Roblox.Roblox", "Moonsworth.LunarClient"],

            Preset::Developer => &[
                "Python.Python.3",
                "Microsoft.VisualStudio.2022.Community",
                "Microsoft.VisualStudioCode",
                "Git.Git",
                "OpenJS.NodeJS",
            ],

            Preset::SecondaryPc => &[
                "7zip.7zip",
                "VideoLAN.VLC",
                "Mozilla.Firefox",
                "Google.Chrome",
                "Notepad++.Notepad++",
            ],

            Preset::Streamer => &[
                "OBSProject.OBSStudio",
                "Streamlabs.Streamlabs",
                "Discord.Discord",
                "Audacity.Audacity",
                "DaVinciResolve.DaVinciResolve",
                "Spotify.Spotify",
                "VideoLAN.VLC",
            ],

            Preset::Productivity => &[
                // Store-backed in some regions
                "Microsoft.Office",
                "Notion.Notion",
                "Google.Drive",
                "Zoom.Zoom",
                "Spotify.Spotify",
            ],

            Preset::CleanMinimalist => &[
                "7zip.7zip",
                "Notepad++.Notepad++",
                "Mozilla.Firefox",
                "voidtools.Everything",
                "VideoLAN.VLC",
            ],

            Preset::Work => &[
                "Google.Chrome",
                "Microsoft.Office",
                "Microsoft.Teams",
                "Zoom.Zoom",
                "SlackTechnologies.Slack",
                "Git.Git",
            ],

            Preset::Family => &[
                "Minecraft.MinecraftLauncher",
                "Roblox.Roblox",
                "Google.Chrome",
                "Spotify.Spotify",
                "VideoLAN.VLC",
            ],
        }
    }
}

/// Entry in the preset menu: every preset followed by a "None" escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOption {
    Preset(Preset),
    None,
}

impl PresetOption {
    /// Menu entries in display order.
    pub fn menu() -> Vec<PresetOption> {
        Preset::iter()
            .map(PresetOption::Preset)
            .chain(std::iter::once(PresetOption::None))
            .collect()
    }

    pub fn preset(&self) -> Option<Preset> {
        match self {
            PresetOption::Preset(p) => Some(*p),
            PresetOption::None => None,
        }
    }
}

impl fmt::Display for PresetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetOption::Preset(p) => write!(f, "{}", p),
            PresetOption::None => write!(f, "None"),
        }
    }
}

/// Browser choice. Edge ships with Windows, so keeping it installs nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Browser {
    #[default]
    #[strum(serialize = "Edge (keep default)")]
    Edge,
    #[strum(serialize = "Chrome")]
    Chrome,
    #[strum(serialize = "Firefox")]
    Firefox,
    #[strum(serialize = "Firefox Nightly")]
    FirefoxNightly,
}

impl Browser {
    pub fn package_id(&self) -> Option<&'static str> {
        match self {
            Browser::Edge => None,
            Browser::Chrome => Some("Google.Chrome"),
            Browser::Firefox => Some("Mozilla.Firefox"),
            Browser::FirefoxNightly => Some("Mozilla.Firefox.Nightly"),
        }
    }

    pub fn menu() -> Vec<Browser> {
        Browser::iter().collect()
    }
}

/// Antivirus choice. "None" leaves Windows Defender in charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Antivirus {
    #[default]
    #[strum(serialize = "None")]
    None,
    #[strum(serialize = "Malwarebytes")]
    Malwarebytes,
    #[strum(serialize = "Avast")]
    Avast,
    #[strum(serialize = "Bitdefender")]
    Bitdefender,
}

impl Antivirus {
    pub fn package_id(&self) -> Option<&'static str> {
        match self {
            Antivirus::None => None,
            Antivirus::Malwarebytes => Some("Malwarebytes.Malwarebytes"),
            Antivirus::Avast => Some("Avast.AntivirusFree"),
            // Vendor listing varies; may fail
            Antivirus::Bitdefender => Some("Bitdefender.TotalSecurity"),
        }
    }

    pub fn menu() -> Vec<Antivirus> {
        Antivirus::iter().collect()
    }
}

/// Yes/No menu answer. "No" is listed first so the safe answer is option 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
pub enum Toggle {
    #[default]
    #[strum(serialize = "No")]
    No,
    #[strum(serialize = "Yes")]
    Yes,
}

impl Toggle {
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn menu() -> Vec<Toggle> {
        Toggle::iter().collect()
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}
