use super::node::PathLink;
use super::{Mode, NodeRef, ValueScope};
use crate::convert::{decode_stream, encode_stream, DEFAULT_ERROR_SYMBOL};
use crate::{
    Error, ErrorKind, Format, SerializationContext, SerializationOptions, TextFormat,
};
use std::io::{Read, Write};

enum Document<'d, N> {
    Owned(N),
    Borrowed(&'d N),
}

/// The top level scope of an archive
///
/// A root scope owns the document of its format together with the options
/// and the context shared by every scope opened from it. Its mode is fixed
/// at construction: a load scope is bound to parsed input or to a native
/// document, a save scope starts from an empty document and produces the
/// format's output when finalized.
///
/// Finalizing is explicit: a save scope dropped without a call to
/// [`RootScope::finalize`] or [`RootScope::finalize_to_writer`] discards its
/// document.
pub struct RootScope<'d, F: Format> {
    mode: Mode,
    document: Document<'d, F::Node>,
    options: SerializationOptions,
    context: SerializationContext,
}

impl<'d, F: Format> RootScope<'d, F> {
    /// A save scope over an empty document
    pub fn save(options: SerializationOptions) -> Self {
        tracing::debug!(format = std::any::type_name::<F>(), "opened save archive");
        RootScope {
            mode: Mode::Save,
            document: Document::Owned(F::Node::default()),
            options,
            context: SerializationContext::new(),
        }
    }

    /// A load scope over a native document
    pub fn load(document: F::Node, options: SerializationOptions) -> Self {
        tracing::debug!(format = std::any::type_name::<F>(), "opened load archive");
        RootScope {
            mode: Mode::Load,
            document: Document::Owned(document),
            options,
            context: SerializationContext::new(),
        }
    }

    /// A load scope over a borrowed native document
    pub fn load_borrowed(document: &'d F::Node, options: SerializationOptions) -> Self {
        tracing::debug!(format = std::any::type_name::<F>(), "opened load archive");
        RootScope {
            mode: Mode::Load,
            document: Document::Borrowed(document),
            options,
            context: SerializationContext::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> &SerializationOptions {
        &self.options
    }

    pub fn context(&self) -> &SerializationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SerializationContext {
        &mut self.context
    }

    /// The document as it currently stands
    pub fn document(&self) -> &F::Node {
        match &self.document {
            Document::Owned(node) => node,
            Document::Borrowed(node) => node,
        }
    }

    /// A scope over the root value of the document
    pub fn value(&mut self) -> ValueScope<'_, F::Node> {
        let node = match (&mut self.document, self.mode) {
            (Document::Owned(node), Mode::Save) => NodeRef::Save(node),
            (Document::Owned(node), Mode::Load) => NodeRef::Load(&*node),
            (Document::Borrowed(node), _) => NodeRef::Load(*node),
        };

        ValueScope::new(node, PathLink::root(), &self.options, &mut self.context)
    }

    /// Finish a load, failing if any validation message was recorded
    pub fn finish(self) -> Result<(), Error> {
        tracing::debug!(
            valid = self.context.is_valid(),
            "finished {:?} archive",
            self.mode
        );
        self.context.into_result()
    }

    /// Finish a save and produce the format's output
    pub fn finalize(self) -> Result<F::Output, Error> {
        tracing::debug!(format = std::any::type_name::<F>(), "finalizing archive");
        match self.document {
            Document::Owned(node) => F::finalize(node, &self.options),
            Document::Borrowed(_) => Err(Error::new(ErrorKind::Message(String::from(
                "a borrowed document cannot be finalized",
            )))),
        }
    }
}

impl<'d, F: TextFormat> RootScope<'d, F> {
    /// A load scope over parsed text
    pub fn load_str(input: &str, options: SerializationOptions) -> Result<Self, Error> {
        let document = F::parse(input)?;
        Ok(Self::load(document, options))
    }

    /// A load scope over a byte stream
    ///
    /// A leading byte order mark selects the stream's encoding, otherwise
    /// the stream must be UTF-8.
    pub fn load_slice(input: &[u8], options: SerializationOptions) -> Result<Self, Error> {
        let (text, encoding) = decode_stream(input, DEFAULT_ERROR_SYMBOL)
            .ok_or_else(|| Error::new(ErrorKind::UnsupportedEncoding))?;
        tracing::debug!(?encoding, len = input.len(), "decoded input stream");
        Self::load_str(&text, options)
    }

    /// A load scope over everything a reader yields
    pub fn load_reader<R: Read>(mut reader: R, options: SerializationOptions) -> Result<Self, Error> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::load_slice(&buf, options)
    }

    /// Finish a save, writing the output in the configured stream encoding
    pub fn finalize_to_writer<W: Write>(self, mut writer: W) -> Result<(), Error> {
        let stream = *self.options.stream();
        let text = self.finalize()?;
        let data = encode_stream(&text, stream.encoding(), stream.write_bom());
        writer.write_all(&data)?;
        Ok(())
    }
}
