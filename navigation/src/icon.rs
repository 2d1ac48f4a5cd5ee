use serde::{Deserialize, Serialize};

/// Closed set of icons a catalog entry may reference.
///
/// Catalog files name icons by string; names that are not listed here resolve
/// to [`IconId::List`] instead of failing the catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconId {
    Home,
    SmartToy,
    Chat,
    Upload,
    Contacts,
    Storage,
    GridOn,
    Note,
    CheckBox,
    TextFields,
    History,
    #[default]
    List,
}

impl IconId {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Home" => IconId::Home,
            "SmartToyOutlined" => IconId::SmartToy,
            "ChatOutlined" => IconId::Chat,
            "DriveFolderUploadOutlined" => IconId::Upload,
            "ContactsOutlined" => IconId::Contacts,
            "StorageOutlined" => IconId::Storage,
            "GridOn" => IconId::GridOn,
            "Note" => IconId::Note,
            "CheckBox" => IconId::CheckBox,
            "TextFields" => IconId::TextFields,
            "History" => IconId::History,
            _ => IconId::List,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            IconId::Home => "Home",
            IconId::SmartToy => "SmartToyOutlined",
            IconId::Chat => "ChatOutlined",
            IconId::Upload => "DriveFolderUploadOutlined",
            IconId::Contacts => "ContactsOutlined",
            IconId::Storage => "StorageOutlined",
            IconId::GridOn => "GridOn",
            IconId::Note => "Note",
            IconId::CheckBox => "CheckBox",
            IconId::TextFields => "TextFields",
            IconId::History => "History",
            IconId::List => "List",
        }
    }

    /// Plain-text rendering used by terminal front ends.
    pub fn glyph(self) -> &'static str {
        match self {
            IconId::Home => "[home]",
            IconId::SmartToy => "[bot]",
            IconId::Chat => "[chat]",
            IconId::Upload => "[upload]",
            IconId::Contacts => "[contacts]",
            IconId::Storage => "[db]",
            IconId::GridOn => "[grid]",
            IconId::Note => "[note]",
            IconId::CheckBox => "[check]",
            IconId::TextFields => "[text]",
            IconId::History => "[history]",
            IconId::List => "[list]",
        }
    }
}

impl From<String> for IconId {
    fn from(value: String) -> Self {
        IconId::from_name(&value)
    }
}

impl From<IconId> for String {
    fn from(icon: IconId) -> Self {
        icon.name().to_string()
    }
}
