//! Minimal indented XML emitter for VTK headers.
//!
//! Only the handful of constructs an image-data file needs: declaration,
//! nested elements, self-closing elements, text lines and raw bytes.

use std::io::{self, Write};

pub(crate) struct XmlEmitter<W: Write> {
    sink: W,
    indent: usize,
}

impl<W: Write> XmlEmitter<W> {
    pub(crate) fn new(sink: W) -> Self {
        Self { sink, indent: 0 }
    }

    fn write_indent(&mut self) -> io::Result<()> {
        for _ in 0..self.indent {
            self.sink.write_all(b"  ")?;
        }
        Ok(())
    }

    fn write_attrs(&mut self, attrs: &[(&str, &str)]) -> io::Result<()> {
        for (key, value) in attrs {
            write!(self.sink, " {key}=\"{value}\"")?;
        }
        Ok(())
    }

    pub(crate) fn declaration(&mut self) -> io::Result<()> {
        writeln!(self.sink, "<?xml version=\"1.0\"?>")
    }

    pub(crate) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.write_indent()?;
        write!(self.sink, "<{name}")?;
        self.write_attrs(attrs)?;
        writeln!(self.sink, ">")?;
        self.indent += 1;
        Ok(())
    }

    pub(crate) fn close(&mut self, name: &str) -> io::Result<()> {
        self.indent = self.indent.saturating_sub(1);
        self.write_indent()?;
        writeln!(self.sink, "</{name}>")
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.write_indent()?;
        write!(self.sink, "<{name}")?;
        self.write_attrs(attrs)?;
        writeln!(self.sink, "/>")
    }

    /// Space-separated values on one indented line
    pub(crate) fn text_line<T: std::fmt::Display>(
        &mut self,
        values: impl Iterator<Item = T>,
    ) -> io::Result<()> {
        self.write_indent()?;
        for (n, value) in values.enumerate() {
            if n > 0 {
                self.sink.write_all(b" ")?;
            }
            write!(self.sink, "{value}")?;
        }
        writeln!(self.sink)
    }

    pub(crate) fn raw(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)
    }

    pub(crate) fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut XmlEmitter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut xml = XmlEmitter::new(Vec::new());
        f(&mut xml).unwrap();
        String::from_utf8(xml.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_nesting_indents() {
        let out = render(|xml| {
            xml.open("A", &[("k", "v")])?;
            xml.open("B", &[])?;
            xml.empty("C", &[("x", "1"), ("y", "2")])?;
            xml.close("B")?;
            xml.close("A")
        });
        assert_eq!(out, "<A k=\"v\">\n  <B>\n    <C x=\"1\" y=\"2\"/>\n  </B>\n</A>\n");
    }

    #[test]
    fn test_text_line_separators() {
        let out = render(|xml| xml.text_line([1.5_f32, 2.0, -3.25].into_iter()));
        assert_eq!(out, "1.5 2 -3.25\n");
    }
}
