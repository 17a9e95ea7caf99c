use crate::cluster::Contribution;
use crate::error::{ProcessingError, Result};

/// Arrange gathered contributions by rank, requiring exactly one per rank.
pub fn order_by_rank(size: usize, contributions: Vec<Contribution>) -> Result<Vec<Contribution>> {
    let mut slots: Vec<Option<Contribution>> = vec![None; size];

    for contribution in contributions {
        contribution.validate()?;
        let rank = contribution.rank;
        let slot = slots.get_mut(rank).ok_or_else(|| {
            ProcessingError::Collective(format!("rank {} is outside a group of {}", rank, size))
        })?;
        if slot.is_some() {
            return Err(ProcessingError::Collective(format!(
                "rank {} contributed more than once",
                rank
            )));
        }
        *slot = Some(contribution);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(rank, slot)| {
            slot.ok_or_else(|| {
                ProcessingError::Collective(format!("rank {} did not contribute", rank))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders_by_rank() -> Result<()> {
        let gathered = vec![
            Contribution::empty(2),
            Contribution::empty(0),
            Contribution::empty(1),
        ];

        let ranks: Vec<usize> = order_by_rank(3, gathered)?.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_requires_every_rank_once() {
        assert!(order_by_rank(2, vec![Contribution::empty(0)]).is_err());
        assert!(order_by_rank(1, vec![Contribution::empty(0), Contribution::empty(0)]).is_err());
        assert!(order_by_rank(1, vec![Contribution::empty(3)]).is_err());
    }
}
