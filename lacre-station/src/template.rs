//! Label layouts
//!
//! Renders label ids into self-terminating ZPL blocks. Field positions
//! and symbology are fixed constants, not configurable per call; a
//! multi-label payload is the per-id blocks joined by single newlines,
//! which the printer executes as independent jobs in file order.

use lacre_printer::ZplBuilder;

use crate::batch::LabelBatch;
use crate::label::LabelId;

/// Header text on process labels
const PROCESS_HEADER: &str = "ETIQUETA DE PROCESSO";

/// Header text on mailer labels
const MAILER_HEADER: &str = "IMB";

/// Darkness level for mailer stock, which takes ink poorly
const MAILER_DARKNESS: i8 = 11;

/// The two fixed label layouts the station prints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelTemplate {
    /// Process-package label: header, Code 128 barcode, id repeated in
    /// human-readable text
    #[default]
    Process,
    /// Mailer label: registration mark, header, taller barcode, id
    /// repeated beside the mark
    Mailer,
}

impl LabelTemplate {
    /// Render one label id as a complete ZPL block
    pub fn render(&self, id: &LabelId) -> String {
        match self {
            Self::Process => Self::render_process(id),
            Self::Mailer => Self::render_mailer(id),
        }
    }

    /// Render a whole batch, blocks joined by single newlines
    ///
    /// Equivalent to joining the per-id renders; the same payload feeds
    /// both direct printing and the download artifact.
    pub fn render_batch(&self, batch: &LabelBatch) -> String {
        batch
            .labels()
            .iter()
            .map(|id| self.render(id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_process(id: &LabelId) -> String {
        let mut z = ZplBuilder::new();
        z.start_format();
        z.field(20, 20).font(30, 30).data(PROCESS_HEADER);
        z.field(20, 60)
            .bar_defaults(2, "2.0", 60)
            .code128(60)
            .data(id.as_str());
        z.field(40, 130).font(25, 25).data(id.as_str());
        z.end_format();
        z.build()
    }

    fn render_mailer(id: &LabelId) -> String {
        let mut z = ZplBuilder::new();
        z.reprint_after_error(false);
        z.start_format();
        z.darkness(MAILER_DARKNESS);
        z.label_home(0, 0);
        // Registration mark: box with crossed diagonals
        z.field(70, 130).graphic_box(100, 40, 2);
        z.field(68, 130).graphic_diagonal(51, 20, 4, false);
        z.field(116, 130).graphic_diagonal(51, 20, 4, true);
        z.field(70, 30).font(30, 30).data(MAILER_HEADER);
        z.field(70, 60)
            .bar_defaults(3, "200", 65)
            .code128(65)
            .data(id.as_str());
        z.field(210, 140).font(30, 30).data(id.as_str());
        z.end_format();
        z.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_block_structure() {
        let zpl = LabelTemplate::Process.render(&LabelId::format("9001941457766", 1));
        assert_eq!(
            zpl,
            "^XA\n\
             ^FO20,20^A0N,30,30^FDETIQUETA DE PROCESSO^FS\n\
             ^FO20,60^BY2,2.0,60^BCN,60,N,N,N,A^FD9001941457766-TJSP001^FS\n\
             ^FO40,130^A0N,25,25^FD9001941457766-TJSP001^FS\n\
             ^XZ"
        );
    }

    #[test]
    fn test_mailer_block_structure() {
        let zpl = LabelTemplate::Mailer.render(&LabelId::from_raw("X-TJSP001"));
        assert!(zpl.starts_with("^JZN\n^XA\n^MD11\n^LH0,0\n"));
        assert!(zpl.contains("^FO70,60^BY3,200,65^BCN,65,N,N,N,A^FDX-TJSP001^FS"));
        assert!(zpl.contains("^FO210,140^A0N,30,30^FDX-TJSP001^FS"));
        assert!(zpl.ends_with("^XZ"));
    }

    #[test]
    fn test_render_batch_joins_with_single_newline() {
        let batch = LabelBatch::generate("X", 3, 50).unwrap();
        let template = LabelTemplate::Process;

        let joined = batch
            .labels()
            .iter()
            .map(|id| template.render(id))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(template.render_batch(&batch), joined);

        // Three self-terminating blocks
        assert_eq!(template.render_batch(&batch).matches("^XZ").count(), 3);
    }
}
