use super::value_range::ValueRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    U8,
    I32,
    I64,
    F32,
}

/// Typed pixel buffer at the API boundary. Everything inside the crate works
/// on `f32`; conversion happens once on the way in and once on the way out.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
}

impl BatchData {
    pub fn format(&self) -> SourceFormat {
        match self {
            BatchData::U8(_) => SourceFormat::U8,
            BatchData::I32(_) => SourceFormat::I32,
            BatchData::I64(_) => SourceFormat::I64,
            BatchData::F32(_) => SourceFormat::F32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BatchData::U8(v) => v.len(),
            BatchData::I32(v) => v.len(),
            BatchData::I64(v) => v.len(),
            BatchData::F32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_f32(&self) -> Vec<f32> {
        match self {
            BatchData::U8(v) => v.iter().map(|&x| x as f32).collect(),
            BatchData::I32(v) => v.iter().map(|&x| x as f32).collect(),
            BatchData::I64(v) => v.iter().map(|&x| x as f32).collect(),
            BatchData::F32(v) => v.clone(),
        }
    }

    /// Casts working values back to `format`. Integer formats round to nearest
    /// and clamp to `range`, float output is only clamped.
    pub fn from_f32(values: &[f32], format: SourceFormat, range: ValueRange) -> Self {
        let rounded = values.iter().map(|&x| range.clamp(x).round());
        match format {
            SourceFormat::U8 => BatchData::U8(rounded.map(|x| x.clamp(0.0, 255.0) as u8).collect()),
            SourceFormat::I32 => BatchData::I32(rounded.map(|x| x as i32).collect()),
            SourceFormat::I64 => BatchData::I64(rounded.map(|x| x as i64).collect()),
            SourceFormat::F32 => BatchData::F32(values.iter().map(|&x| range.clamp(x)).collect()),
        }
    }
}
