//! Record → document direction of the mapper.

use serde::ser::{
    self, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant, SerializeTuple,
    SerializeTupleStruct, SerializeTupleVariant, Serializer,
};
use serde::Serialize;

use crate::error::{MapperError, MapperResult};
use crate::value::{Document, Value};

/// Project a record into its document form.
///
/// Fields are emitted in declaration order under their serde tag. The
/// record must serialize as a struct or map; anything else is
/// [`MapperError::NotARecord`].
pub fn to_document<T: Serialize + ?Sized>(record: &T) -> MapperResult<Document> {
    match to_value(record)? {
        Value::Document(doc) => Ok(doc),
        other => Err(MapperError::NotARecord(other.kind().to_string())),
    }
}

/// Project any serializable value into a document [`Value`].
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> MapperResult<Value> {
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = Value;
    type Error = MapperError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder<SeqBuilder>;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantBuilder<MapBuilder>;

    fn serialize_bool(self, v: bool) -> MapperResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> MapperResult<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> MapperResult<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> MapperResult<Value> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| MapperError::IntegerOutOfRange(v))
    }

    fn serialize_f32(self, v: f32) -> MapperResult<Value> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> MapperResult<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> MapperResult<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> MapperResult<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> MapperResult<Value> {
        Ok(Value::Array(
            v.iter().map(|b| Value::Int(i64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> MapperResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> MapperResult<Value> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> MapperResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> MapperResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> MapperResult<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> MapperResult<Value> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> MapperResult<Value> {
        let mut doc = Document::new();
        doc.insert(variant, value.serialize(ValueSerializer)?);
        Ok(Value::Document(doc))
    }

    fn serialize_seq(self, len: Option<usize>) -> MapperResult<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> MapperResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> MapperResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> MapperResult<VariantBuilder<SeqBuilder>> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_seq(Some(len))?,
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> MapperResult<MapBuilder> {
        Ok(MapBuilder {
            doc: Document::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> MapperResult<MapBuilder> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> MapperResult<VariantBuilder<MapBuilder>> {
        Ok(VariantBuilder {
            variant,
            inner: self.serialize_map(Some(len))?,
        })
    }
}

struct SeqBuilder {
    items: Vec<Value>,
}

impl SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> MapperResult<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> MapperResult<Value> {
        Ok(Value::Array(self.items))
    }
}

impl SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> MapperResult<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> MapperResult<Value> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> MapperResult<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> MapperResult<Value> {
        SerializeSeq::end(self)
    }
}

struct MapBuilder {
    doc: Document,
    pending_key: Option<String>,
}

impl SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> MapperResult<()> {
        match key.serialize(ValueSerializer)? {
            Value::String(k) => {
                self.pending_key = Some(k);
                Ok(())
            }
            _ => Err(MapperError::NonStringKey),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> MapperResult<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| {
                <MapperError as ser::Error>::custom("serialize_value called before serialize_key")
            })?;
        self.doc.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> MapperResult<Value> {
        Ok(Value::Document(self.doc))
    }
}

impl SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> MapperResult<()> {
        self.doc.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> MapperResult<Value> {
        Ok(Value::Document(self.doc))
    }
}

/// Wraps a tuple or struct variant as `{variant: inner}`.
struct VariantBuilder<B> {
    variant: &'static str,
    inner: B,
}

impl<B> VariantBuilder<B> {
    fn wrap(variant: &'static str, inner: Value) -> Value {
        let mut doc = Document::new();
        doc.insert(variant, inner);
        Value::Document(doc)
    }
}

impl SerializeTupleVariant for VariantBuilder<SeqBuilder> {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> MapperResult<()> {
        SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> MapperResult<Value> {
        let inner = SerializeSeq::end(self.inner)?;
        Ok(Self::wrap(self.variant, inner))
    }
}

impl SerializeStructVariant for VariantBuilder<MapBuilder> {
    type Ok = Value;
    type Error = MapperError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> MapperResult<()> {
        SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> MapperResult<Value> {
        let inner = SerializeStruct::end(self.inner)?;
        Ok(Self::wrap(self.variant, inner))
    }
}
