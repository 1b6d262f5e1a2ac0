use std::collections::BTreeMap;

use chrono::Duration;
use chrono::naive::NaiveDate;
use chrono::Datelike;

use super::aggregate::RegionDayRecord;


#[derive(Clone,Debug)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub weekly_new_cases: f64,
    pub weekly_new_deaths: f64,
}


// First differences of the cumulative columns. The day before the first
// record of a series counts as zero, so the first increment equals the
// first cumulative value; downward revisions stay negative. Expects
// records sorted by (region, country, date).
pub fn difference(records: &mut [RegionDayRecord]) {

    let mut prev_cases = 0.0;
    let mut prev_deaths = 0.0;

    for i in 0..records.len() {
	if i == 0 || records[i].region != records[i-1].region
	    || records[i].country != records[i-1].country {
	    prev_cases = 0.0;
	    prev_deaths = 0.0;
	}
	records[i].new_cases = records[i].cases - prev_cases;
	records[i].new_deaths = records[i].deaths - prev_deaths;
	prev_cases = records[i].cases;
	prev_deaths = records[i].deaths;
    }

}


// Weeks run Monday through Sunday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}


// Weeks with non-positive totals are kept; hiding them is a
// presentation decision.
pub fn weekly(records: &[RegionDayRecord]) -> Vec<WeeklyBucket> {

    let mut weeks: BTreeMap<NaiveDate,(f64,f64)> = BTreeMap::new();

    for record in records {
	let entry = weeks.entry(week_start(record.date)).or_insert((0.0, 0.0));
	entry.0 += record.new_cases;
	entry.1 += record.new_deaths;
    }

    weeks.into_iter().map(
	|(week_start,(weekly_new_cases,weekly_new_deaths))| WeeklyBucket {
	    week_start,
	    weekly_new_cases,
	    weekly_new_deaths,
	}
    ).collect()

}


#[cfg(test)]
mod tests {

    use super::*;

    fn record(region: &str, date: NaiveDate, cases: f64, deaths: f64) -> RegionDayRecord {
	RegionDayRecord {
	    region: region.to_string(),
	    country: "US".to_string(),
	    date,
	    cases,
	    deaths,
	    population: 1000.0,
	    cases_per_million: cases * 1000.0,
	    deaths_per_million: deaths * 1000.0,
	    new_cases: 0.0,
	    new_deaths: 0.0,
	}
    }

    fn series(region: &str, start_day: u32, cumulative: &[f64]) -> Vec<RegionDayRecord> {
	cumulative.iter().enumerate().map(
	    |(i,c)| record(region, NaiveDate::from_ymd(2021, 3, start_day + i as u32), *c, *c / 10.0)
	).collect()
    }

    #[test]
    fn first_difference_boundary() {
	let mut records = series("Alpha", 1, &[0.0, 5.0, 5.0, 12.0]);
	difference(&mut records);
	let new: Vec<f64> = records.iter().map(|r| r.new_cases).collect();
	assert_eq!(new, vec![0.0, 5.0, 0.0, 7.0]);
    }

    #[test]
    fn difference_restarts_per_region() {
	let mut records = series("Alpha", 1, &[10.0, 15.0]);
	records.extend(series("Beta", 1, &[100.0, 130.0]));
	difference(&mut records);
	let new: Vec<f64> = records.iter().map(|r| r.new_cases).collect();
	assert_eq!(new, vec![10.0, 5.0, 100.0, 30.0]);
    }

    #[test]
    fn downward_revisions_stay_negative() {
	let mut records = series("Alpha", 1, &[10.0, 8.0, 9.0]);
	difference(&mut records);
	let new: Vec<f64> = records.iter().map(|r| r.new_cases).collect();
	assert_eq!(new, vec![10.0, -2.0, 1.0]);
    }

    #[test]
    fn week_starts_on_monday() {
	// 2021-03-01 was a Monday
	assert_eq!(week_start(NaiveDate::from_ymd(2021, 3, 1)), NaiveDate::from_ymd(2021, 3, 1));
	assert_eq!(week_start(NaiveDate::from_ymd(2021, 3, 3)), NaiveDate::from_ymd(2021, 3, 1));
	assert_eq!(week_start(NaiveDate::from_ymd(2021, 3, 7)), NaiveDate::from_ymd(2021, 3, 1));
	assert_eq!(week_start(NaiveDate::from_ymd(2021, 3, 8)), NaiveDate::from_ymd(2021, 3, 8));
    }

    #[test]
    fn weekly_sums_conserve_daily_increments() {
	let cumulative: Vec<f64> = (1..11).map(|i| (i * i) as f64).collect();
	let mut records = series("Alpha", 1, &cumulative);
	difference(&mut records);
	let weeks = weekly(&records);
	assert_eq!(weeks.len(), 2);
	let weekly_total: f64 = weeks.iter().map(|w| w.weekly_new_cases).sum();
	let daily_total: f64 = records.iter().map(|r| r.new_cases).sum();
	assert!((weekly_total - daily_total).abs() < 1e-9);
	assert_eq!(weekly_total, 100.0);
    }

    #[test]
    fn non_positive_weeks_are_kept() {
	let mut records = series("Alpha", 1, &[10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0, 10.0]);
	difference(&mut records);
	let weeks = weekly(&records[1..]);
	assert_eq!(weeks.len(), 2);
	assert_eq!(weeks[0].weekly_new_cases, 0.0);
	assert_eq!(weeks[1].weekly_new_cases, 0.0);
    }

}
