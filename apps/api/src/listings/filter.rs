use crate::listings::criteria::Criteria;
use crate::models::job::Job;

/// Returns the jobs matching every provided criterion, newest first.
///
/// The input is left untouched. Jobs posted at the same instant keep their
/// input order (`sort_by` is stable), so identical input always yields an
/// identical result.
pub fn filter_jobs(jobs: &[Job], criteria: &Criteria) -> Vec<Job> {
    let predicate = criteria.predicate();
    let mut matched: Vec<Job> = jobs
        .iter()
        .filter(|job| predicate.matches(job))
        .cloned()
        .collect();
    sort_newest_first(&mut matched);
    matched
}

/// Number of jobs matching `criteria`. Order is irrelevant so nothing is cloned.
pub fn count_matching(jobs: &[Job], criteria: &Criteria) -> usize {
    if criteria.is_empty() {
        return jobs.len();
    }
    let predicate = criteria.predicate();
    jobs.iter().filter(|job| predicate.matches(job)).count()
}

pub fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted.cmp(&a.posted));
}
