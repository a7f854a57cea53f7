use log::{debug, warn};

use crate::config::*;

/// Votes counted per candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Tally {
    /// Configured candidates first, in order, then any other name found in
    /// the records in order of first appearance.
    pub counts: Vec<(String, u64)>,
    pub total: u64,
}

/// Counts the votes for each candidate.
///
/// Every configured candidate appears, even without votes. A name in the
/// records that no candidate matches is counted under that name.
pub fn tally(records: &[VoteRecord], candidates: &[Candidate]) -> Tally {
    let mut counts: Vec<(String, u64)> = candidates.iter().map(|c| (c.name.clone(), 0)).collect();
    for r in records.iter() {
        match counts.iter_mut().find(|(name, _)| *name == r.candidate) {
            Some((_, count)) => *count += 1,
            None => {
                warn!(
                    "tally: vote from {} for unlisted candidate {:?}",
                    r.voter_id, r.candidate
                );
                counts.push((r.candidate.clone(), 1));
            }
        }
    }
    debug!("tally: {:?}", counts);
    Tally {
        counts,
        total: records.len() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_voter_id;

    fn vote(id: &str, candidate: &str) -> VoteRecord {
        VoteRecord {
            voter_id: validate_voter_id(id).unwrap(),
            candidate: candidate.to_string(),
        }
    }

    #[test]
    fn counts_in_candidate_order() {
        let votes = vec![
            vote("0001", "John"),
            vote("0002", "Jane"),
            vote("0003", "John"),
        ];
        let t = tally(&votes, &Candidate::default_list());
        assert_eq!(
            t.counts,
            vec![("Jane".to_string(), 1), ("John".to_string(), 2)]
        );
        assert_eq!(t.total, 3);
    }

    #[test]
    fn empty_and_unlisted() {
        let t = tally(&[], &Candidate::default_list());
        assert_eq!(t.counts.iter().map(|(_, c)| *c).sum::<u64>(), 0);
        assert_eq!(t.counts.len(), 2);

        let votes = vec![vote("0001", "Zed"), vote("0002", "Zed"), vote("0003", "Amy")];
        let t = tally(&votes, &Candidate::default_list());
        assert_eq!(
            t.counts,
            vec![
                ("Jane".to_string(), 0),
                ("John".to_string(), 0),
                ("Zed".to_string(), 2),
                ("Amy".to_string(), 1)
            ]
        );
        assert_eq!(t.total, 3);
    }
}
