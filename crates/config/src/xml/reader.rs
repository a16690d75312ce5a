use std::io::{BufRead, Cursor};

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use super::{XmlElement, XmlEvent};
use crate::loader::ConfigError;

/// Pull cursor over a single XML document.
///
/// Owns the underlying stream; dropping the reader releases it.
pub struct XmlReader {
    inner: NsReader<Box<dyn BufRead>>,
    buf: Vec<u8>,
    event: XmlEvent,
    depth: usize,
    resource: String,
}

impl XmlReader {
    /// Create a reader over `source`, reporting errors against `resource`.
    pub fn new(resource: impl Into<String>, source: Box<dyn BufRead>) -> Self {
        let mut inner = NsReader::from_reader(source);
        let config = inner.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;

        Self {
            inner,
            buf: Vec::new(),
            event: XmlEvent::StartDocument,
            depth: 0,
            resource: resource.into(),
        }
    }

    /// Create a reader over an in-memory document.
    pub fn from_string(resource: impl Into<String>, xml: impl Into<String>) -> Self {
        let bytes = xml.into().into_bytes();
        Self::new(resource, Box::new(Cursor::new(bytes)))
    }

    pub fn event(&self) -> &XmlEvent {
        &self.event
    }

    /// Nesting level of the cursor: 1 while on the root start tag, 0 after its end.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The resource url this reader was opened for.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Diagnostic location of the cursor: resource url plus byte offset.
    pub fn location(&self) -> String {
        format!("{} (at byte {})", self.resource, self.inner.buffer_position())
    }

    pub fn element(&self) -> Option<&XmlElement> {
        match &self.event {
            XmlEvent::Start(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self.event, XmlEvent::Start(_))
    }

    /// Whether the cursor is on a start tag with the given local name.
    pub fn is_start_named(&self, local_name: &str) -> bool {
        self.element().is_some_and(|e| e.local_name() == local_name)
    }

    pub fn local_name(&self) -> Option<&str> {
        self.element().map(XmlElement::local_name)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.element().and_then(XmlElement::namespace)
    }

    /// Raw attribute of the current start tag.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element().and_then(|e| e.attribute(name))
    }

    /// Advance to the next significant event. Returns `false` at end of document.
    pub fn next(&mut self) -> Result<bool, ConfigError> {
        loop {
            self.buf.clear();
            let next = {
                let (resolved, event) = self
                    .inner
                    .read_resolved_event_into(&mut self.buf)
                    .map_err(|cause| ConfigError::Xml {
                        location: self.resource.clone(),
                        cause,
                    })?;

                match event {
                    Event::Start(start) => {
                        let namespace = match resolved {
                            ResolveResult::Bound(ns) => {
                                Some(String::from_utf8_lossy(ns.as_ref()).into_owned())
                            }
                            ResolveResult::Unbound => None,
                            ResolveResult::Unknown(prefix) => {
                                return Err(ConfigError::UnsupportedNamespace {
                                    namespace: String::from_utf8_lossy(&prefix).into_owned(),
                                    location: self.resource.clone(),
                                });
                            }
                        };

                        let mut attributes = Vec::new();
                        for attr in start.attributes() {
                            let attr = attr.map_err(|e| ConfigError::Xml {
                                location: self.resource.clone(),
                                cause: quick_xml::Error::from(e),
                            })?;
                            if attr.key.as_namespace_binding().is_some() {
                                continue;
                            }
                            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                            let value = attr
                                .unescape_value()
                                .map_err(|cause| ConfigError::Xml {
                                    location: self.resource.clone(),
                                    cause,
                                })?
                                .into_owned();
                            attributes.push((key, value));
                        }

                        Some(XmlEvent::Start(XmlElement {
                            namespace,
                            local_name: String::from_utf8_lossy(start.local_name().as_ref())
                                .into_owned(),
                            attributes,
                            position: self.inner.buffer_position() as u64,
                        }))
                    }
                    Event::End(_) => Some(XmlEvent::End),
                    Event::Text(text) => {
                        let text = text.unescape().map_err(|cause| ConfigError::Xml {
                            location: self.resource.clone(),
                            cause,
                        })?;
                        if text.trim().is_empty() {
                            None
                        } else {
                            Some(XmlEvent::Text(text.into_owned()))
                        }
                    }
                    Event::CData(data) => Some(XmlEvent::Text(
                        String::from_utf8_lossy(&data.into_inner()).into_owned(),
                    )),
                    Event::Eof => Some(XmlEvent::Eof),
                    _ => None,
                }
            };

            let Some(event) = next else {
                continue;
            };

            match &event {
                XmlEvent::Start(_) => self.depth += 1,
                XmlEvent::End => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            let more = !matches!(event, XmlEvent::Eof);
            self.event = event;
            return Ok(more);
        }
    }

    /// Advance to the next start tag at any depth. Returns `false` at end of document.
    pub fn next_start(&mut self) -> Result<bool, ConfigError> {
        while self.next()? {
            if self.is_start() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Advance to the next immediate child of the element opened at `parent_depth`.
    ///
    /// Returns `false` once the parent's end tag has been consumed. Content of
    /// children that the caller did not consume is skipped.
    pub fn next_child(&mut self, parent_depth: usize) -> Result<bool, ConfigError> {
        loop {
            if !self.next()? {
                return Err(ConfigError::UnexpectedEof {
                    location: self.resource.clone(),
                });
            }
            match self.event {
                XmlEvent::Start(_) if self.depth == parent_depth + 1 => return Ok(true),
                XmlEvent::End if self.depth < parent_depth => return Ok(false),
                _ => {}
            }
        }
    }

    /// Consume the element under the cursor including its end tag.
    ///
    /// Does nothing unless the cursor is on a start tag.
    pub fn skip_element(&mut self) -> Result<(), ConfigError> {
        if !self.is_start() {
            return Ok(());
        }
        let depth = self.depth;
        while self.next_child(depth)? {}
        Ok(())
    }

    /// Read the direct text of the element under the cursor and consume its end tag.
    ///
    /// Text of nested elements is skipped. The result is trimmed.
    pub fn read_text(&mut self) -> Result<String, ConfigError> {
        if !self.is_start() {
            return Ok(String::new());
        }
        let depth = self.depth;
        let mut text = String::new();

        loop {
            if !self.next()? {
                return Err(ConfigError::UnexpectedEof {
                    location: self.resource.clone(),
                });
            }
            match &self.event {
                XmlEvent::Text(chunk) if self.depth == depth => text.push_str(chunk),
                XmlEvent::End if self.depth < depth => break,
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }
}
