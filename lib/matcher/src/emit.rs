//! JSON emission of recommendations
//!
//! ```json
//! {
//!   "GetEmail": [
//!     { "field": "email", "score": 0.93 }
//!   ]
//! }
//! ```

use crate::aggregate::Recommendations;
use fieldmatch_core::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::io::Write;

impl Serialize for Recommendations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for api in self.iter() {
            map.serialize_entry(&api.api, &api.entries)?;
        }
        map.end()
    }
}

impl Recommendations {
    /// Two-space indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Write pretty JSON followed by a newline
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| Error::Serialization(e.to_string()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
