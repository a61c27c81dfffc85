//! IO implementations for `ProcessTree`

use std::io::Write;

use crate::core::io::{Exportable, ExtensionWithMime};
use crate::core::process_models::case_centric::process_tree::ProcessTree;
use crate::core::process_models::io::{export_json, ModelIOError};

impl Exportable for ProcessTree {
    type Error = ModelIOError;
    type ExportOptions = ();

    fn export_to_writer_with_options<W: Write>(
        &self,
        writer: W,
        format: &str,
        _: Self::ExportOptions,
    ) -> Result<(), Self::Error> {
        export_json(self, writer, format)
    }

    fn known_export_formats() -> Vec<ExtensionWithMime> {
        vec![ExtensionWithMime::new("json", "application/json")]
    }
}
