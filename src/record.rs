//! Journal record as handed over by the entry store.

use std::sync::Arc;

use crate::style::catalog::ArtifactStyle;

/// Encoded photo bytes attached to a record (any format the `image` crate decodes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Photo(pub Arc<Vec<u8>>);

impl Photo {
    /// Wrap encoded image bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    /// Borrow the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// Optional weather tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
    Stormy,
    Foggy,
}

impl Weather {
    /// Short label printed on artifacts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rain",
            Self::Snowy => "Snow",
            Self::Windy => "Windy",
            Self::Stormy => "Storm",
            Self::Foggy => "Fog",
        }
    }
}

/// One journal entry plus the artifact style chosen for it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct JournalRecord {
    /// Stable record identifier (also seeds decorative serials).
    pub id: String,
    /// Artifact style attached at creation/edit time.
    pub style: ArtifactStyle,
    /// Free-text entry body.
    pub content: String,
    /// Mood tag.
    pub mood: String,
    /// Attached photos; not part of the JSON form.
    #[serde(skip)]
    pub photos: Vec<Photo>,
    /// Optional weather tag.
    #[serde(default)]
    pub weather: Option<Weather>,
    /// Display date (already formatted by the caller).
    #[serde(default)]
    pub date: Option<String>,
}

impl JournalRecord {
    /// Record without photos, weather or date.
    pub fn new(
        id: impl Into<String>,
        style: ArtifactStyle,
        content: impl Into<String>,
        mood: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            style,
            content: content.into(),
            mood: mood.into(),
            photos: Vec::new(),
            weather: None,
            date: None,
        }
    }

    /// Attach a photo.
    pub fn with_photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    /// Set the weather tag.
    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Set the display date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Same record with a different style.
    pub fn restyled(&self, style: ArtifactStyle) -> Self {
        Self {
            style,
            ..self.clone()
        }
    }
}
