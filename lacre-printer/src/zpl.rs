//! ZPL command builder
//!
//! Provides a fluent API for building ZPL label programs.

use crate::encoding::sanitize_field;

/// ZPL command builder
///
/// Builds ZPL text for Zebra-compatible label printers. Commands are
/// emitted one layout line at a time: positional commands (`field`,
/// `font`, `bar_defaults`, `code128`) accumulate on the current line and
/// a data or graphic command terminates it. A finished program is one
/// `start_format`..`end_format` block per label; blocks are
/// self-terminating, so concatenated programs print as independent jobs.
pub struct ZplBuilder {
    buf: String,
}

impl ZplBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(256),
        }
    }

    // === Format Control ===

    /// Begin a label format (`^XA`)
    pub fn start_format(&mut self) -> &mut Self {
        self.line("^XA")
    }

    /// End a label format (`^XZ`)
    ///
    /// The block is complete after this call; the printer executes it as
    /// one job.
    pub fn end_format(&mut self) -> &mut Self {
        self.line("^XZ")
    }

    /// Enable or disable automatic reprint after an error (`^JZ`)
    pub fn reprint_after_error(&mut self, enabled: bool) -> &mut Self {
        let flag = if enabled { 'Y' } else { 'N' };
        self.buf.push_str("^JZ");
        self.buf.push(flag);
        self.buf.push('\n');
        self
    }

    /// Set media darkness (`^MD`), clamped to the printer range -30..=30
    pub fn darkness(&mut self, level: i8) -> &mut Self {
        let level = level.clamp(-30, 30);
        self.line(&format!("^MD{}", level))
    }

    /// Set the label home position (`^LH`)
    pub fn label_home(&mut self, x: u32, y: u32) -> &mut Self {
        self.line(&format!("^LH{},{}", x, y))
    }

    // === Field Layout ===

    /// Open a field at the given origin (`^FO`)
    ///
    /// Follow with `font`/`bar_defaults`/`code128` and terminate the
    /// field with `data` or one of the graphic commands.
    pub fn field(&mut self, x: u32, y: u32) -> &mut Self {
        self.buf.push_str(&format!("^FO{},{}", x, y));
        self
    }

    /// Select the scalable font for the current field (`^A0N`)
    pub fn font(&mut self, height: u32, width: u32) -> &mut Self {
        self.buf.push_str(&format!("^A0N,{},{}", height, width));
        self
    }

    /// Set barcode field defaults (`^BY`): module width in dots,
    /// wide-to-narrow ratio and default bar height
    pub fn bar_defaults(&mut self, module_width: u8, ratio: &str, height: u32) -> &mut Self {
        self.buf
            .push_str(&format!("^BY{},{},{}", module_width, ratio, height));
        self
    }

    /// Start a Code 128 barcode in the current field (`^BC`)
    ///
    /// Normal orientation, no interpretation line, automatic mode.
    pub fn code128(&mut self, height: u32) -> &mut Self {
        self.buf.push_str(&format!("^BCN,{},N,N,N,A", height));
        self
    }

    /// Write field data and close the field (`^FD`..`^FS`)
    ///
    /// The data is sanitized: ZPL command prefixes and control bytes are
    /// stripped before embedding.
    pub fn data(&mut self, data: &str) -> &mut Self {
        self.buf
            .push_str(&format!("^FD{}^FS\n", sanitize_field(data)));
        self
    }

    // === Graphics ===

    /// Draw a box in the current field (`^GB`) and close it
    pub fn graphic_box(&mut self, width: u32, height: u32, thickness: u32) -> &mut Self {
        self.buf
            .push_str(&format!("^GB{},{},{}^FS\n", width, height, thickness));
        self
    }

    /// Draw a diagonal line in the current field (`^GD`) and close it
    ///
    /// `right_leaning` selects the `R` (bottom-left to top-right) stroke,
    /// otherwise `L`.
    pub fn graphic_diagonal(
        &mut self,
        width: u32,
        height: u32,
        thickness: u32,
        right_leaning: bool,
    ) -> &mut Self {
        let orientation = if right_leaning { 'R' } else { 'L' };
        self.buf.push_str(&format!(
            "^GD{},{},{},,{}^FS\n",
            width, height, thickness, orientation
        ));
        self
    }

    // === Output ===

    /// Get the finished ZPL program, without a trailing newline
    pub fn build(&self) -> String {
        self.buf.trim_end().to_string()
    }

    fn line(&mut self, cmd: &str) -> &mut Self {
        self.buf.push_str(cmd);
        self.buf.push('\n');
        self
    }
}

impl Default for ZplBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_block() {
        let mut z = ZplBuilder::new();
        z.start_format();
        z.field(20, 20).font(30, 30).data("ETIQUETA DE PROCESSO");
        z.field(20, 60)
            .bar_defaults(2, "2.0", 60)
            .code128(60)
            .data("X-TJSP001");
        z.field(40, 130).font(25, 25).data("X-TJSP001");
        z.end_format();

        assert_eq!(
            z.build(),
            "^XA\n\
             ^FO20,20^A0N,30,30^FDETIQUETA DE PROCESSO^FS\n\
             ^FO20,60^BY2,2.0,60^BCN,60,N,N,N,A^FDX-TJSP001^FS\n\
             ^FO40,130^A0N,25,25^FDX-TJSP001^FS\n\
             ^XZ"
        );
    }

    #[test]
    fn test_data_is_sanitized() {
        let mut z = ZplBuilder::new();
        z.field(0, 0).data("a^b~c");

        assert_eq!(z.build(), "^FO0,0^FDabc^FS");
    }

    #[test]
    fn test_graphics() {
        let mut z = ZplBuilder::new();
        z.field(70, 130).graphic_box(100, 40, 2);
        z.field(68, 130).graphic_diagonal(51, 20, 4, false);
        z.field(116, 130).graphic_diagonal(51, 20, 4, true);

        let out = z.build();
        assert!(out.contains("^FO70,130^GB100,40,2^FS"));
        assert!(out.contains("^GD51,20,4,,L^FS"));
        assert!(out.contains("^GD51,20,4,,R^FS"));
    }

    #[test]
    fn test_darkness_clamped() {
        let mut z = ZplBuilder::new();
        z.darkness(120);
        assert_eq!(z.build(), "^MD30");
    }

    #[test]
    fn test_build_has_no_trailing_newline() {
        let mut z = ZplBuilder::new();
        z.start_format();
        z.end_format();
        assert_eq!(z.build(), "^XA\n^XZ");
    }
}
