//! Message decoding and per-datagram orchestration.

use std::time::Instant;

use bytestream::ByteReader;
use protocol16::{
    decode_parameter_table, decode_tagged, ParameterTable, OPERATION_CODE_PARAMETER,
};
use wire::{Command, CommandKind, FragmentHeader, UNRELIABLE_PREFIX_SIZE};

use crate::cache::{FragmentCache, FragmentOutcome};
use crate::config::DecoderConfig;
use crate::error::CodecResult;
use crate::message::{DecodedMessage, MessageCategory, ResponseHeader, UnhandledMessage};
use crate::registry::{BuildFn, BuilderRegistry};

/// Decodes a complete message body: signature, category, then the payload.
///
/// The signature byte is not validated. Builder failures are contained and
/// yield [`DecodedMessage::Unhandled`].
pub fn decode_message_body<M>(
    body: &[u8],
    registry: &BuilderRegistry<M>,
    limits: &protocol16::Limits,
) -> CodecResult<DecodedMessage<M>> {
    let mut reader = ByteReader::new(body);
    let category = MessageCategory::from_raw(reader.read_u8_after(1)?);

    let message = match category {
        MessageCategory::Event => {
            let header_code = reader.read_u8()?;
            let parameters = decode_parameter_table(&mut reader, limits)?;
            let code = registry.event_code(header_code, &parameters);
            dispatch(
                category,
                Some(code),
                registry.event(code),
                parameters,
                DecodedMessage::Event,
            )
        }
        MessageCategory::OperationRequest => {
            reader.skip(1)?;
            let parameters = decode_parameter_table(&mut reader, limits)?;
            let code = parameters.code(OPERATION_CODE_PARAMETER);
            let build = code.and_then(|code| registry.request(code));
            dispatch(category, code, build, parameters, DecodedMessage::Request)
        }
        MessageCategory::OperationResponse | MessageCategory::InternalOperationResponse => {
            let operation_code = reader.read_u8()?;
            let return_code = reader.read_i16()?;
            let debug_message = decode_tagged(&mut reader, limits)?;
            let parameters = decode_parameter_table(&mut reader, limits)?;
            DecodedMessage::Unhandled(UnhandledMessage {
                category,
                code: Some(u16::from(operation_code)),
                response: Some(ResponseHeader {
                    operation_code,
                    return_code,
                    debug_message,
                }),
                parameters,
            })
        }
        MessageCategory::Other(raw) => {
            log::trace!("ignoring message category {raw}");
            DecodedMessage::Other
        }
    };
    Ok(message)
}

fn dispatch<M>(
    category: MessageCategory,
    code: Option<u16>,
    build: Option<BuildFn<M>>,
    parameters: ParameterTable,
    wrap: fn(M) -> DecodedMessage<M>,
) -> DecodedMessage<M> {
    if let Some(build) = build {
        match build(&parameters) {
            Ok(message) => return wrap(message),
            Err(err) => {
                log::warn!("builder for {category:?} code {code:?} failed: {err}");
            }
        }
    }
    DecodedMessage::Unhandled(UnhandledMessage {
        category,
        code,
        response: None,
        parameters,
    })
}

/// Routes one framed command by kind.
///
/// Fragments go through `cache` and are decoded only once complete.
pub fn decode_command<M>(
    command: &Command<'_>,
    cache: &mut FragmentCache,
    registry: &BuilderRegistry<M>,
    config: &DecoderConfig,
    now: Instant,
) -> CodecResult<DecodedMessage<M>> {
    match command.kind {
        CommandKind::Reliable => decode_message_body(command.body, registry, &config.values),
        CommandKind::Unreliable => {
            let mut reader = ByteReader::new(command.body);
            reader.skip(UNRELIABLE_PREFIX_SIZE)?;
            decode_message_body(reader.rest(), registry, &config.values)
        }
        CommandKind::Fragment => {
            let (header, payload) = FragmentHeader::parse(command.body)?;
            match cache.accept(&header, payload, now)? {
                FragmentOutcome::Pending { received, needed } => {
                    Ok(DecodedMessage::FragmentPending {
                        sequence_number: header.sequence_number,
                        received,
                        needed,
                    })
                }
                FragmentOutcome::Complete(bytes) => {
                    decode_message_body(&bytes, registry, &config.values)
                }
            }
        }
        CommandKind::Other(_) => Ok(DecodedMessage::Other),
    }
}

/// Decodes every command of one UDP payload, in command order.
///
/// Framing errors end the datagram but keep messages already decoded. A
/// command that fails to decode yields [`DecodedMessage::Other`] and does
/// not affect its siblings.
pub fn decode_datagram<M>(
    payload: &[u8],
    cache: &mut FragmentCache,
    registry: &BuilderRegistry<M>,
    config: &DecoderConfig,
    now: Instant,
) -> Vec<DecodedMessage<M>> {
    let datagram = match wire::decode_datagram(payload, &config.framing) {
        Ok(datagram) => datagram,
        Err(err) => {
            log::debug!("discarding datagram: {err}");
            return Vec::new();
        }
    };

    let mut messages = Vec::with_capacity(usize::from(datagram.header.command_count));
    for result in datagram.commands {
        let command = match result {
            Ok(command) => command,
            Err(err) if err.is_recoverable() => {
                log::debug!("skipping command: {err}");
                messages.push(DecodedMessage::Other);
                continue;
            }
            Err(err) => {
                log::debug!("discarding rest of datagram: {err}");
                break;
            }
        };
        log::trace!(
            "command {:?} channel {} len {}",
            command.kind,
            command.channel_id,
            command.declared_len
        );
        match decode_command(&command, cache, registry, config, now) {
            Ok(message) => messages.push(message),
            Err(err) => {
                log::debug!("discarding {:?} command: {err}", command.kind);
                messages.push(DecodedMessage::Other);
            }
        }
    }
    messages
}

/// Single owner of a registry, a fragment cache and a config.
#[derive(Debug)]
pub struct DatagramDecoder<M> {
    registry: BuilderRegistry<M>,
    cache: FragmentCache,
    config: DecoderConfig,
}

impl<M> DatagramDecoder<M> {
    #[must_use]
    pub fn new(registry: BuilderRegistry<M>, config: DecoderConfig) -> Self {
        let cache = FragmentCache::new(config.limits.clone(), config.eviction);
        Self {
            registry,
            cache,
            config,
        }
    }

    /// Decodes a UDP payload using the current time.
    pub fn decode(&mut self, payload: &[u8]) -> Vec<DecodedMessage<M>> {
        self.decode_at(payload, Instant::now())
    }

    /// Decodes a UDP payload at an explicit time.
    pub fn decode_at(&mut self, payload: &[u8], now: Instant) -> Vec<DecodedMessage<M>> {
        decode_datagram(payload, &mut self.cache, &self.registry, &self.config, now)
    }

    /// Strips the configured link-layer header, then decodes.
    pub fn decode_frame(&mut self, frame: &[u8]) -> Vec<DecodedMessage<M>> {
        match wire::strip_link_header(frame, &self.config.framing) {
            Ok(payload) => self.decode(payload),
            Err(err) => {
                log::debug!("discarding frame: {err}");
                Vec::new()
            }
        }
    }

    pub fn evict_expired(&mut self, now: Instant) -> usize {
        self.cache.evict_expired(now)
    }

    /// Number of incomplete fragmented messages.
    #[must_use]
    pub fn pending_fragments(&self) -> usize {
        self.cache.pending_count()
    }

    #[must_use]
    pub const fn registry(&self) -> &BuilderRegistry<M> {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &DecoderConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &FragmentCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryBuilder;
    use bytestream::ByteWriter;
    use protocol16::{encode_parameter_table, encode_tagged, ParameterError, Value};

    #[derive(Debug, PartialEq)]
    enum Msg {
        Ping(i64),
        Move(String),
    }

    fn ping(table: &ParameterTable) -> Result<Msg, ParameterError> {
        table.integral(0).map(Msg::Ping)
    }

    fn mover(table: &ParameterTable) -> Result<Msg, ParameterError> {
        table.string(0).map(|s| Msg::Move(s.to_owned()))
    }

    fn registry() -> BuilderRegistry<Msg> {
        let mut builder = RegistryBuilder::new();
        builder.register_event(1, ping).unwrap();
        builder.register_event(3, mover).unwrap();
        builder.register_request(21, ping).unwrap();
        builder.build()
    }

    fn event_body(code: u8, table: &ParameterTable) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xF3).write_u8(4).write_u8(code);
        encode_parameter_table(&mut writer, table).unwrap();
        writer.finish()
    }

    fn decode(body: &[u8]) -> DecodedMessage<Msg> {
        decode_message_body(body, &registry(), &protocol16::Limits::default()).unwrap()
    }

    #[test]
    fn event_dispatches_by_header_code() {
        let body = event_body(1, &ParameterTable::from([(0, Value::Integer(9))]));
        assert_eq!(decode(&body), DecodedMessage::Event(Msg::Ping(9)));
    }

    #[test]
    fn parameter_252_overrides_header_code() {
        let table = ParameterTable::from([
            (0, Value::String("42".into())),
            (252, Value::Short(3)),
        ]);
        let body = event_body(1, &table);
        assert_eq!(decode(&body), DecodedMessage::Event(Msg::Move("42".into())));
    }

    #[test]
    fn move_header_ignores_252() {
        let table = ParameterTable::from([
            (0, Value::String("42".into())),
            (252, Value::Byte(1)),
        ]);
        let body = event_body(3, &table);
        assert_eq!(decode(&body), DecodedMessage::Event(Msg::Move("42".into())));
    }

    #[test]
    fn non_numeric_252_falls_back_to_header() {
        let table = ParameterTable::from([
            (0, Value::Integer(4)),
            (252, Value::String("3".into())),
        ]);
        let body = event_body(1, &table);
        assert_eq!(decode(&body), DecodedMessage::Event(Msg::Ping(4)));
    }

    #[test]
    fn unknown_event_is_unhandled_with_table() {
        let table = ParameterTable::from([(7, Value::Boolean(true))]);
        let body = event_body(99, &table);
        let DecodedMessage::Unhandled(unhandled) = decode(&body) else {
            panic!("expected unhandled");
        };
        assert_eq!(unhandled.category, MessageCategory::Event);
        assert_eq!(unhandled.code, Some(99));
        assert_eq!(unhandled.parameters, table);
    }

    #[test]
    fn builder_failure_is_contained() {
        let table = ParameterTable::from([(0, Value::String("not a number".into()))]);
        let body = event_body(1, &table);
        assert!(matches!(decode(&body), DecodedMessage::Unhandled(_)));
    }

    #[test]
    fn request_dispatches_on_253() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xF3).write_u8(2).write_u8(0);
        let table = ParameterTable::from([(0, Value::Integer(1)), (253, Value::Short(21))]);
        encode_parameter_table(&mut writer, &table).unwrap();
        assert_eq!(decode(&writer.finish()), DecodedMessage::Request(Msg::Ping(1)));
    }

    #[test]
    fn request_without_code_is_unhandled() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xF3).write_u8(2).write_u8(21);
        encode_parameter_table(&mut writer, &ParameterTable::new()).unwrap();
        let DecodedMessage::Unhandled(unhandled) = decode(&writer.finish()) else {
            panic!("expected unhandled");
        };
        assert_eq!(unhandled.code, None);
    }

    #[test]
    fn response_is_never_dispatched() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0xF3).write_u8(7).write_u8(3).write_i16(-2);
        encode_tagged(&mut writer, &Value::Null).unwrap();
        let table = ParameterTable::from([(0, Value::String("42".into()))]);
        encode_parameter_table(&mut writer, &table).unwrap();

        let DecodedMessage::Unhandled(unhandled) = decode(&writer.finish()) else {
            panic!("expected unhandled");
        };
        assert_eq!(unhandled.category, MessageCategory::InternalOperationResponse);
        let response = unhandled.response.unwrap();
        assert_eq!(response.operation_code, 3);
        assert_eq!(response.return_code, -2);
        assert_eq!(response.debug_message, Value::Null);
    }

    #[test]
    fn unsupported_category_is_other() {
        assert_eq!(decode(&[0xF3, 9, 1, 2]), DecodedMessage::Other);
    }

    #[test]
    fn short_body_is_an_error() {
        let result = decode_message_body(&[0xF3], &registry(), &protocol16::Limits::default());
        assert!(result.is_err());
    }
}
