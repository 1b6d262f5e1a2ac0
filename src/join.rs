use std::collections::BTreeMap;

use chrono::naive::NaiveDate;

use super::reshape::LongRow;


#[derive(Clone,Debug)]
pub struct Observation {
    pub uid: u64,
    pub region: String,
    pub country: String,
    pub date: NaiveDate,
    pub cases: Option<f64>,
    pub deaths: Option<f64>,
    pub population: Option<f64>,
}

impl Observation {
    fn from_row(row: &LongRow) -> Self {
	Self {
	    uid: row.identity.uid,
	    region: row.identity.region.clone(),
	    country: row.identity.country.clone(),
	    date: row.date,
	    cases: None,
	    deaths: None,
	    population: None,
	}
    }
}


// Full outer join on (uid, date); a key present on only one side keeps
// None for the other side's counts. Coordinates and the sub-region name
// end here.
pub fn join(cases: &[LongRow], deaths: &[LongRow]) -> Vec<Observation> {

    let mut merged: BTreeMap<(u64,NaiveDate),Observation> = BTreeMap::new();

    for row in cases {
	let obs = merged.entry((row.identity.uid, row.date))
	    .or_insert_with(|| Observation::from_row(row));
	obs.cases = Some(row.value);
	if row.population.is_some() {
	    obs.population = row.population;
	}
    }

    for row in deaths {
	let obs = merged.entry((row.identity.uid, row.date))
	    .or_insert_with(|| Observation::from_row(row));
	obs.deaths = Some(row.value);
	if row.population.is_some() {
	    obs.population = row.population;
	}
    }

    merged.into_iter().map(|(_,obs)| obs).collect()

}


// Zero population cannot produce a per-capita rate and zero cumulative
// cases is pre-outbreak noise; an entity re-enters once its cumulative
// cases turn positive.
pub fn filter_analyzable(observations: Vec<Observation>) -> Vec<Observation> {
    observations.into_iter().filter(
	|obs| obs.cases.map_or(false, |c| c > 0.0)
	    && obs.population.map_or(false, |p| p > 0.0)
    ).collect()
}
