use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Thematic group an artifact style belongs to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Letters and mail.
    Correspondence,
    /// Receipts, admission and travel tickets.
    Tickets,
    /// Small physical mementos.
    Keepsakes,
    /// Records and tapes.
    Music,
    /// Desk stationery.
    Desk,
}

impl Collection {
    /// Human-readable collection title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Correspondence => "Correspondence",
            Self::Tickets => "Tickets & Receipts",
            Self::Keepsakes => "Keepsakes",
            Self::Music => "Music",
            Self::Desk => "Desk",
        }
    }
}

/// Decorative template applied to a journal record for export.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactStyle {
    Envelope,
    Postcard,
    Telegram,
    WaxSealLetter,
    Receipt,
    ThermalTicket,
    MovieTicket,
    ConcertTicket,
    BoardingPass,
    TrainTicket,
    Polaroid,
    FilmStrip,
    Bookmark,
    PressedFlower,
    Stamp,
    Matchbook,
    VinylLabel,
    Cassette,
    StickyNote,
    IndexCard,
    Typewriter,
    Notebook,
    LibraryCard,
    Calendar,
    FortuneCookie,
}

impl ArtifactStyle {
    /// Every style, in catalog order.
    pub const ALL: [ArtifactStyle; 25] = [
        Self::Envelope,
        Self::Postcard,
        Self::Telegram,
        Self::WaxSealLetter,
        Self::Receipt,
        Self::ThermalTicket,
        Self::MovieTicket,
        Self::ConcertTicket,
        Self::BoardingPass,
        Self::TrainTicket,
        Self::Polaroid,
        Self::FilmStrip,
        Self::Bookmark,
        Self::PressedFlower,
        Self::Stamp,
        Self::Matchbook,
        Self::VinylLabel,
        Self::Cassette,
        Self::StickyNote,
        Self::IndexCard,
        Self::Typewriter,
        Self::Notebook,
        Self::LibraryCard,
        Self::Calendar,
        Self::FortuneCookie,
    ];

    /// Stable kebab-case identifier (matches the serde representation).
    pub fn name(self) -> &'static str {
        match self {
            Self::Envelope => "envelope",
            Self::Postcard => "postcard",
            Self::Telegram => "telegram",
            Self::WaxSealLetter => "wax-seal-letter",
            Self::Receipt => "receipt",
            Self::ThermalTicket => "thermal-ticket",
            Self::MovieTicket => "movie-ticket",
            Self::ConcertTicket => "concert-ticket",
            Self::BoardingPass => "boarding-pass",
            Self::TrainTicket => "train-ticket",
            Self::Polaroid => "polaroid",
            Self::FilmStrip => "film-strip",
            Self::Bookmark => "bookmark",
            Self::PressedFlower => "pressed-flower",
            Self::Stamp => "stamp",
            Self::Matchbook => "matchbook",
            Self::VinylLabel => "vinyl-label",
            Self::Cassette => "cassette",
            Self::StickyNote => "sticky-note",
            Self::IndexCard => "index-card",
            Self::Typewriter => "typewriter",
            Self::Notebook => "notebook",
            Self::LibraryCard => "library-card",
            Self::Calendar => "calendar",
            Self::FortuneCookie => "fortune-cookie",
        }
    }

    /// Title shown on the artifact header.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Envelope => "Envelope",
            Self::Postcard => "Postcard",
            Self::Telegram => "Telegram",
            Self::WaxSealLetter => "Sealed Letter",
            Self::Receipt => "Receipt",
            Self::ThermalTicket => "Thermal Ticket",
            Self::MovieTicket => "Admit One",
            Self::ConcertTicket => "Live Tonight",
            Self::BoardingPass => "Boarding Pass",
            Self::TrainTicket => "Rail Ticket",
            Self::Polaroid => "Polaroid",
            Self::FilmStrip => "Film Strip",
            Self::Bookmark => "Bookmark",
            Self::PressedFlower => "Pressed Flower",
            Self::Stamp => "Stamp",
            Self::Matchbook => "Matchbook",
            Self::VinylLabel => "Side A",
            Self::Cassette => "Mixtape",
            Self::StickyNote => "Note to Self",
            Self::IndexCard => "Index Card",
            Self::Typewriter => "Typewritten",
            Self::Notebook => "Notebook",
            Self::LibraryCard => "Library Card",
            Self::Calendar => "Calendar",
            Self::FortuneCookie => "Fortune",
        }
    }

    /// Collection the style is listed under.
    pub fn collection(self) -> Collection {
        match self {
            Self::Envelope | Self::Postcard | Self::Telegram | Self::WaxSealLetter => {
                Collection::Correspondence
            }
            Self::Receipt
            | Self::ThermalTicket
            | Self::MovieTicket
            | Self::ConcertTicket
            | Self::BoardingPass
            | Self::TrainTicket => Collection::Tickets,
            Self::Polaroid
            | Self::FilmStrip
            | Self::Bookmark
            | Self::PressedFlower
            | Self::Stamp
            | Self::Matchbook => Collection::Keepsakes,
            Self::VinylLabel | Self::Cassette => Collection::Music,
            Self::StickyNote
            | Self::IndexCard
            | Self::Typewriter
            | Self::Notebook
            | Self::LibraryCard
            | Self::Calendar
            | Self::FortuneCookie => Collection::Desk,
        }
    }

    /// Styles in `collection`, in catalog order.
    pub fn in_collection(collection: Collection) -> impl Iterator<Item = ArtifactStyle> {
        Self::ALL
            .into_iter()
            .filter(move |s| s.collection() == collection)
    }
}

impl std::fmt::Display for ArtifactStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ArtifactStyle {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> KeepsakeResult<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| KeepsakeError::validation(format!("unknown artifact style '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/catalog.rs"]
mod tests;
