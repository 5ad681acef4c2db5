//! The on-disk `connections.xml` format.
//!
//! ```xml
//! <FtpConnections>
//!   <Profile name="prod">
//!     <Host>ftp.example.com</Host>
//!     <Username>alice</Username>
//!     <Password>secret</Password>
//!     <UseSsl>true</UseSsl>
//!   </Profile>
//! </FtpConnections>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::se::Serializer;
use quick_xml::Reader;
use serde::Serialize;
use std::fmt::Display;
use std::str;

use super::errors::StoreError;
use super::profile::ConnectionProfile;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

const ROOT_TAG: &[u8] = b"FtpConnections";
const PROFILE_TAG: &[u8] = b"Profile";

// Nesting level of each element, counting the root as 1.
const ROOT_DEPTH: usize = 1;
const PROFILE_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

#[derive(Debug, Default, Serialize)]
#[serde(rename = "FtpConnections")]
struct ProfileDocument {
    #[serde(rename = "Profile")]
    profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Default, Serialize)]
struct ProfileEntry {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "Host")]
    host: String,
    #[serde(rename = "Username")]
    username: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "UseSsl")]
    use_ssl: bool,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Host,
    Username,
    Password,
    UseSsl,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"Host" => Some(Field::Host),
            b"Username" => Some(Field::Username),
            b"Password" => Some(Field::Password),
            b"UseSsl" => Some(Field::UseSsl),
            _ => None,
        }
    }
}

impl ProfileEntry {
    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Host => self.host = value,
            Field::Username => self.username = value,
            Field::Password => self.password = value,
            Field::UseSsl => self.use_ssl = parse_bool(&value),
        }
    }
}

/// `true`/`false` in any case; anything else reads as `false`.
fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

impl From<ProfileEntry> for ConnectionProfile {
    fn from(entry: ProfileEntry) -> Self {
        ConnectionProfile::new(
            entry.name,
            entry.host,
            entry.username,
            entry.password,
            entry.use_ssl,
        )
    }
}

impl From<&ConnectionProfile> for ProfileEntry {
    fn from(profile: &ConnectionProfile) -> Self {
        ProfileEntry {
            name: profile.name.clone(),
            host: profile.host.clone(),
            username: profile.username.clone(),
            password: profile.password.clone(),
            use_ssl: profile.use_ssl,
        }
    }
}

fn malformed(err: impl Display) -> StoreError {
    StoreError::Document(err.to_string())
}

/// Collects `Profile` entries while the reader walks the document.
#[derive(Default)]
struct ProfileCollector {
    depth: usize,
    seen_root: bool,
    entries: Vec<ProfileEntry>,
    entry: Option<ProfileEntry>,
    field: Option<(Field, String)>,
}

impl ProfileCollector {
    fn open(&mut self, element: &BytesStart) -> Result<(), StoreError> {
        self.depth += 1;
        let name = element.name();
        match (self.depth, name.as_ref()) {
            (ROOT_DEPTH, ROOT_TAG) => self.seen_root = true,
            (ROOT_DEPTH, other) => {
                return Err(StoreError::Document(format!(
                    "expected <FtpConnections> root element, found <{}>",
                    String::from_utf8_lossy(other)
                )))
            }
            (PROFILE_DEPTH, PROFILE_TAG) => {
                self.entry = Some(ProfileEntry {
                    name: name_attribute(element)?,
                    ..ProfileEntry::default()
                });
            }
            (FIELD_DEPTH, tag) if self.entry.is_some() => {
                self.field = Field::from_tag(tag).map(|field| (field, String::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn text(&mut self, value: &str) {
        if self.depth != FIELD_DEPTH {
            return;
        }
        if let Some((_, buffer)) = self.field.as_mut() {
            buffer.push_str(value);
        }
    }

    fn close(&mut self) {
        match self.depth {
            FIELD_DEPTH => {
                if let (Some(entry), Some((field, value))) = (self.entry.as_mut(), self.field.take())
                {
                    entry.set(field, value);
                }
            }
            PROFILE_DEPTH => {
                if let Some(entry) = self.entry.take() {
                    self.entries.push(entry);
                }
            }
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> Result<Vec<ProfileEntry>, StoreError> {
        if !self.seen_root {
            return Err(StoreError::Document(
                "missing <FtpConnections> root element".into(),
            ));
        }
        if self.depth != 0 {
            return Err(StoreError::Document("unexpected end of document".into()));
        }
        Ok(self.entries)
    }
}

fn name_attribute(element: &BytesStart) -> Result<String, StoreError> {
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref() == b"name" {
            return Ok(attr.unescape_value().map_err(malformed)?.into_owned());
        }
    }
    Ok(String::new())
}

/// Parse a whole document. Entries without a name are dropped.
///
/// Element text is taken verbatim, so credentials with leading or trailing
/// spaces read back exactly as they were written.
pub fn parse(xml: &str) -> Result<Vec<ConnectionProfile>, StoreError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut collector = ProfileCollector::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            StoreError::Document(format!(
                "XML error at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;
        match event {
            Event::Start(ref e) => collector.open(e)?,
            Event::Empty(ref e) => {
                collector.open(e)?;
                collector.close();
            }
            Event::End(_) => collector.close(),
            Event::Text(ref t) => collector.text(&t.unescape().map_err(malformed)?),
            Event::CData(ref c) => collector.text(str::from_utf8(c).map_err(malformed)?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(collector
        .finish()?
        .into_iter()
        .filter(|entry| !entry.name.is_empty())
        .map(ConnectionProfile::from)
        .collect())
}

/// Render `profiles` as a complete document, in the order given.
pub fn render<'a>(
    profiles: impl IntoIterator<Item = &'a ConnectionProfile>,
) -> Result<String, StoreError> {
    let document = ProfileDocument {
        profiles: profiles.into_iter().map(ProfileEntry::from).collect(),
    };

    let mut xml = String::from(XML_DECLARATION);
    let mut serializer = Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| StoreError::Document(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}
