use std::collections::BTreeMap;

use chrono::naive::NaiveDate;

use super::error::{Result,Error};
use super::join::Observation;


#[derive(Clone,Copy,Debug,PartialEq)]
pub enum NullPolicy {
    ZeroFill,
    Propagate,
}

#[derive(Clone,Debug)]
pub struct RegionDayRecord {
    pub region: String,
    pub country: String,
    pub date: NaiveDate,
    pub cases: f64,
    pub deaths: f64,
    pub population: f64,
    pub cases_per_million: f64,
    pub deaths_per_million: f64,
    pub new_cases: f64,
    pub new_deaths: f64,
}


pub fn sum_counts(values: &[Option<f64>], policy: NullPolicy) -> f64 {
    match policy {
	NullPolicy::ZeroFill => values.iter().map(|v| v.unwrap_or(0.0)).sum(),
	NullPolicy::Propagate => values.iter().map(|v| v.unwrap_or(f64::NAN)).sum(),
    }
}


// A missing population propagates as NaN; a definite zero reaching a
// per-capita derivation is a contract violation.
pub fn per_capita(value: f64, population: f64, scale: f64, context: &str) -> Result<f64> {
    if population > 0.0 {
	Ok(value * scale / population)
    } else if population.is_nan() {
	Ok(f64::NAN)
    } else {
	Err(Error::ZeroPopulation(context.to_string()))
    }
}


// Sub-units roll up into one record per (region, country, date). The
// summed population is only complete for dates on which every sub-unit
// reports.
pub fn aggregate(observations: &[Observation], policy: NullPolicy) -> Result<Vec<RegionDayRecord>> {

    let mut groups: BTreeMap<(String,String,NaiveDate),(Vec<Option<f64>>,Vec<Option<f64>>,Vec<Option<f64>>)> =
	BTreeMap::new();

    for obs in observations {
	let entry = groups.entry((obs.region.clone(), obs.country.clone(), obs.date))
	    .or_insert_with(|| (Vec::new(), Vec::new(), Vec::new()));
	entry.0.push(obs.cases);
	entry.1.push(obs.deaths);
	entry.2.push(obs.population);
    }

    groups.into_iter().map(|((region,country,date),(cases,deaths,populations))| {
	let cases = sum_counts(&cases, policy);
	let deaths = sum_counts(&deaths, policy);
	let population = sum_counts(&populations, policy);
	Ok(RegionDayRecord {
	    cases_per_million: per_capita(cases, population, 1_000_000.0, &region)?,
	    deaths_per_million: per_capita(deaths, population, 1_000_000.0, &region)?,
	    region,
	    country,
	    date,
	    cases,
	    deaths,
	    population,
	    new_cases: 0.0,
	    new_deaths: 0.0,
	})
    }).collect()

}
