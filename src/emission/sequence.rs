use rand::Rng;

use crate::core::{DocumentError, DocumentResult};
use crate::models::{InvoiceNumber, NUMBERING_CAPACITY};

/// Bloque de `count` números de factura consecutivos a partir de `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSequence {
    start: u64,
    count: u64,
}

impl InvoiceSequence {
    pub fn new(start: u64, count: u64) -> DocumentResult<Self> {
        validate_count(count)?;
        if start > NUMBERING_CAPACITY - count {
            return Err(DocumentError::invalid_argument(format!(
                "la secuencia {}+{} excede el espacio de 16 dígitos",
                start, count
            )));
        }
        Ok(InvoiceSequence { start, count })
    }

    /// Elige un inicio uniforme en `[0, 10^16 - count]`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, count: u64) -> DocumentResult<Self> {
        validate_count(count)?;
        let start = rng.gen_range(0..=NUMBERING_CAPACITY - count);
        Ok(InvoiceSequence { start, count })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn len(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = InvoiceNumber> {
        // start + count <= 10^16 garantizado al construir
        (self.start..self.start + self.count).map(InvoiceNumber)
    }
}

fn validate_count(count: u64) -> DocumentResult<()> {
    if count == 0 {
        return Err(DocumentError::invalid_argument(
            "la cantidad de facturas debe ser positiva",
        ));
    }
    if count >= NUMBERING_CAPACITY {
        return Err(DocumentError::invalid_argument(
            "la cantidad solicitada excede el máximo posible de números secuenciales",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn numbers_are_consecutive_and_unique() {
        let mut rng = StdRng::seed_from_u64(11);
        for count in [1u64, 2, 17, 250] {
            let sequence = InvoiceSequence::random(&mut rng, count).unwrap();
            let numbers: Vec<InvoiceNumber> = sequence.iter().collect();

            assert_eq!(numbers.len() as u64, count);
            for (i, number) in numbers.iter().enumerate() {
                assert_eq!(number.value(), sequence.start() + i as u64);
                let text = number.to_string();
                assert_eq!(text.len(), 16);
                assert!(text.bytes().all(|b| b.is_ascii_digit()));
            }
            let unique: HashSet<String> = numbers.iter().map(ToString::to_string).collect();
            assert_eq!(unique.len() as u64, count);
        }
    }

    #[test]
    fn capacity_boundary_is_rejected() {
        let mut rng = StdRng::seed_from_u64(12);
        for count in [NUMBERING_CAPACITY, NUMBERING_CAPACITY + 1, u64::MAX] {
            let err = InvoiceSequence::random(&mut rng, count).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert!(InvoiceSequence::random(&mut rng, 0).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn largest_allowed_count_fits_the_space() {
        let mut rng = StdRng::seed_from_u64(13);
        let sequence = InvoiceSequence::random(&mut rng, NUMBERING_CAPACITY - 1).unwrap();
        assert!(sequence.start() <= 1);
        let last = sequence.iter().next_back().unwrap();
        assert!(last.value() < NUMBERING_CAPACITY);
    }

    #[test]
    fn explicit_start_must_stay_in_range() {
        let tail = InvoiceSequence::new(NUMBERING_CAPACITY - 3, 3).unwrap();
        assert_eq!(
            tail.iter().next_back().unwrap().to_string(),
            "9999999999999999"
        );
        assert!(InvoiceSequence::new(NUMBERING_CAPACITY - 2, 3)
            .unwrap_err()
            .is_invalid_argument());
    }
}
