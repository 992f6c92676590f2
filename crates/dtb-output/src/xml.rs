//! XML output.

use std::io::Write;

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use dtb_model::{Dataset, FieldValue};

use crate::common::{DATASET_NAME, populated_levels};
use crate::format::EncodeOptions;

/// Write the dataset as `<dtb>` with one element per populated level and one
/// empty element per record, columns as attributes.
pub fn write_xml<W: Write>(dataset: &Dataset, options: EncodeOptions, writer: W) -> Result<()> {
    let mut xml = if options.minify {
        Writer::new(writer)
    } else {
        Writer::new_with_indent(writer, b' ', 2)
    };
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new(DATASET_NAME);
    root.push_attribute(("edition", dataset.edition()));
    root.push_attribute(("layout", dataset.layout().as_str()));
    root.push_attribute(("created", timestamp.as_str()));
    xml.write_event(Event::Start(root))?;

    for level in populated_levels(dataset) {
        let columns = dataset.columns(level);
        xml.write_event(Event::Start(BytesStart::new(level.table_name())))?;
        for record in dataset.records(level) {
            let mut element = BytesStart::new(level.as_str());
            for (column, value) in columns.iter().zip(record.values()) {
                match value {
                    FieldValue::Integer(id) => {
                        let text = id.to_string();
                        element.push_attribute((column.as_str(), text.as_str()));
                    }
                    FieldValue::Text(text) => element.push_attribute((column.as_str(), text)),
                }
            }
            xml.write_event(Event::Empty(element))?;
        }
        xml.write_event(Event::End(BytesEnd::new(level.table_name())))?;
    }

    xml.write_event(Event::End(BytesEnd::new(DATASET_NAME)))?;
    Ok(())
}
