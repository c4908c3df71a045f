//! Bit layout of a packed identifier

use super::{GeneratorOptions, Method};

/// Usable bits of an id; bit 63 always stays clear
pub(crate) const ID_BITS: u8 = 63;

/// Shifts and masks derived from [`GeneratorOptions`]
///
/// Classic ids are `[timestamp | data center | worker | sequence]`, drift ids
/// are `[timestamp | worker | sequence]` and carry no data center field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    seq_bits: u8,
    worker_bits: u8,
    data_center_bits: u8,
    worker_shift: u8,
    data_center_shift: u8,
    timestamp_shift: u8,
    seq_mask: u64,
    worker_mask: u64,
    data_center_mask: u64,
    timestamp_mask: u64,
}

impl Layout {
    pub(crate) fn for_options(options: &GeneratorOptions) -> Self {
        let data_center_bits = match options.method() {
            Method::Classic => options.data_center_id_bit_length(),
            Method::Drift => 0,
        };
        Self::new(
            options.seq_bit_length(),
            options.worker_id_bit_length(),
            data_center_bits,
        )
    }

    pub(crate) const fn new(seq_bits: u8, worker_bits: u8, data_center_bits: u8) -> Self {
        let worker_shift = seq_bits;
        let data_center_shift = seq_bits + worker_bits;
        let timestamp_shift = data_center_shift + data_center_bits;
        Self {
            seq_bits,
            worker_bits,
            data_center_bits,
            worker_shift,
            data_center_shift,
            timestamp_shift,
            seq_mask: mask(seq_bits),
            worker_mask: mask(worker_bits),
            data_center_mask: mask(data_center_bits),
            timestamp_mask: mask(ID_BITS - timestamp_shift),
        }
    }

    /// Combine the fields into an id. Callers keep every field in range;
    /// out-of-range bits are masked off rather than bleeding into neighbours.
    #[inline(always)]
    pub(crate) const fn pack(
        &self,
        timestamp: i64,
        data_center_id: u16,
        worker_id: u16,
        sequence: u32,
    ) -> i64 {
        let raw = ((timestamp as u64 & self.timestamp_mask) << self.timestamp_shift)
            | ((data_center_id as u64 & self.data_center_mask) << self.data_center_shift)
            | ((worker_id as u64 & self.worker_mask) << self.worker_shift)
            | (sequence as u64 & self.seq_mask);
        raw as i64
    }

    #[inline(always)]
    pub const fn timestamp_bits(&self) -> u8 {
        ID_BITS - self.timestamp_shift
    }

    /// Largest elapsed time the timestamp field can hold
    #[inline(always)]
    pub const fn max_timestamp(&self) -> i64 {
        self.timestamp_mask as i64
    }

    #[inline(always)]
    pub const fn seq_bits(&self) -> u8 {
        self.seq_bits
    }

    #[inline(always)]
    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    /// Zero under drift
    #[inline(always)]
    pub const fn data_center_bits(&self) -> u8 {
        self.data_center_bits
    }

    #[inline(always)]
    pub(crate) const fn timestamp_shift(&self) -> u8 {
        self.timestamp_shift
    }

    #[inline(always)]
    pub(crate) const fn worker_shift(&self) -> u8 {
        self.worker_shift
    }

    #[inline(always)]
    pub(crate) const fn data_center_shift(&self) -> u8 {
        self.data_center_shift
    }

    #[inline(always)]
    pub(crate) const fn timestamp_mask(&self) -> u64 {
        self.timestamp_mask
    }

    #[inline(always)]
    pub(crate) const fn worker_mask(&self) -> u64 {
        self.worker_mask
    }

    #[inline(always)]
    pub(crate) const fn data_center_mask(&self) -> u64 {
        self.data_center_mask
    }

    #[inline(always)]
    pub(crate) const fn seq_mask(&self) -> u64 {
        self.seq_mask
    }
}

#[inline(always)]
const fn mask(bits: u8) -> u64 {
    if bits == 0 {
        0
    } else {
        (1u64 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_drift_layout() {
        let layout = GeneratorOptions::default().layout();

        assert_eq!(layout.seq_bits(), 6);
        assert_eq!(layout.worker_bits(), 6);
        assert_eq!(layout.data_center_bits(), 0);
        assert_eq!(layout.worker_shift(), 6);
        assert_eq!(layout.timestamp_shift(), 12);
        assert_eq!(layout.timestamp_bits(), 51);
        assert_eq!(layout.seq_mask(), 0x3F);
        assert_eq!(layout.worker_mask(), 0x3F);
        assert_eq!(layout.data_center_mask(), 0);
    }

    #[test]
    fn test_classic_layout_embeds_data_center() {
        let options = GeneratorOptions::builder()
            .method(Method::Classic)
            .data_center_id_bit_length(5)
            .unwrap()
            .build()
            .unwrap();
        let layout = options.layout();

        assert_eq!(layout.data_center_bits(), 5);
        assert_eq!(layout.data_center_shift(), 12);
        assert_eq!(layout.timestamp_shift(), 17);
        assert_eq!(layout.timestamp_bits(), 46);
        assert_eq!(layout.data_center_mask(), 0x1F);
    }

    #[test]
    fn test_pack_places_fields() {
        let layout = Layout::new(12, 10, 0);
        let id = layout.pack(0x1234567, 0, 42, 123);

        assert_eq!(id & 0xFFF, 123);
        assert_eq!((id >> 12) & 0x3FF, 42);
        assert_eq!(id >> 22, 0x1234567);
    }

    #[test]
    fn test_pack_never_sets_sign_bit() {
        let layout = Layout::new(21, 1, 10);
        let id = layout.pack(i64::MAX, u16::MAX, u16::MAX, u32::MAX);

        assert!(id >= 0);
        assert_eq!(id, i64::MAX);
        assert_eq!(layout.max_timestamp(), (1i64 << 31) - 1);
    }
}
