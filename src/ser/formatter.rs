use std::io;

/// The layout of a regular entry with the default options.
///
/// ```bib
/// @article{key,
///     author = {Author},
///     title  = {Title}
/// }
/// ```
pub struct DefaultFormatter {}

impl Formatter for DefaultFormatter {
    const VALIDATE: bool = false;
}

/// The default layout, refusing to write values with unbalanced braces.
pub struct ValidatingFormatter {}

impl Formatter for ValidatingFormatter {
    const VALIDATE: bool = true;
}

/// Every item on a single line, with no optional whitespace.
///
/// ```bib
/// @article{key,author={Author},title={Title}}
/// ```
pub struct CompactFormatter {}

impl Formatter for CompactFormatter {
    const VALIDATE: bool = false;

    #[inline]
    fn write_entry_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\n")
    }

    #[inline]
    fn write_entry_key_end<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b",")
    }

    #[inline]
    fn write_field_start<W>(&mut self, _writer: &mut W, _indent: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_field_padding<W>(&mut self, _writer: &mut W, _width: usize) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_field_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"=")
    }

    #[inline]
    fn write_token_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"#")
    }

    #[inline]
    fn write_field_end<W>(&mut self, writer: &mut W, last: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if last { Ok(()) } else { writer.write_all(b",") }
    }

    #[inline]
    fn write_auxiliary_start<W>(&mut self, _writer: &mut W, _indent: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }

    #[inline]
    fn write_auxiliary_end<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        Ok(())
    }
}

/// Hooks which write the individual parts of a bibliography.
pub trait Formatter {
    /// Check that field values have balanced braces before writing them.
    const VALIDATE: bool;

    #[inline]
    fn write_entry_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\n\n")
    }

    #[inline]
    fn write_entry_type<W>(&mut self, writer: &mut W, entry_type: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"@")?;
        writer.write_all(entry_type.as_bytes())
    }

    #[inline]
    fn write_body_start<W>(&mut self, writer: &mut W, braces: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if braces { b"{" } else { b"(" })
    }

    #[inline]
    fn write_entry_key<W>(&mut self, writer: &mut W, key: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(key.as_bytes())
    }

    #[inline]
    fn write_entry_key_end<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b",\n")
    }

    #[inline]
    fn write_field_start<W>(&mut self, writer: &mut W, indent: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(indent.as_bytes())
    }

    #[inline]
    fn write_field_key<W>(&mut self, writer: &mut W, key: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(key.as_bytes())
    }

    /// Pad a field key by `width` spaces so that the field separators line up.
    #[inline]
    fn write_field_padding<W>(&mut self, writer: &mut W, width: usize) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write!(writer, "{:width$}", "")
    }

    #[inline]
    fn write_field_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b" = ")
    }

    #[inline]
    fn write_token_separator<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b" # ")
    }

    #[inline]
    fn write_bracketed_token<W>(&mut self, writer: &mut W, token: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"{")?;
        writer.write_all(token.as_bytes())?;
        writer.write_all(b"}")
    }

    #[inline]
    fn write_quoted_token<W>(&mut self, writer: &mut W, token: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\"")?;
        writer.write_all(token.as_bytes())?;
        writer.write_all(b"\"")
    }

    #[inline]
    fn write_variable_token<W>(&mut self, writer: &mut W, variable: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(variable.as_bytes())
    }

    #[inline]
    fn write_field_end<W>(&mut self, writer: &mut W, last: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if last { b"\n" } else { b",\n" })
    }

    #[inline]
    fn write_body_end<W>(&mut self, writer: &mut W, braces: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if braces { b"}" } else { b")" })
    }

    /// Start the contents of a multi-line `@string`, `@preamble` or `@comment`.
    #[inline]
    fn write_auxiliary_start<W>(&mut self, writer: &mut W, indent: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\n")?;
        writer.write_all(indent.as_bytes())
    }

    #[inline]
    fn write_auxiliary_end<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\n")
    }

    /// Free text between entries.
    #[inline]
    fn write_comment<W>(&mut self, writer: &mut W, comment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(comment.trim().as_bytes())
    }
}
