//! IO implementations for `LifecycleNet`

use std::io::Write;

use crate::core::io::{Exportable, ExtensionWithMime};
use crate::core::process_models::case_centric::petri_net::LifecycleNet;
use crate::core::process_models::io::{export_json, ModelIOError};

impl Exportable for LifecycleNet {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_net_json() {
        let net = LifecycleNet::single_transition(Some("a".into()), None);
        let bytes = net.export_to_bytes("json").unwrap();
        let back: LifecycleNet = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(back, net);
        assert_eq!(back.places[1].name, "P1");
        assert!(matches!(
            net.export_to_bytes("pnml"),
            Err(ModelIOError::UnsupportedFormat(_))
        ));
    }
}
