use std::collections::BTreeMap;

use super::error::{Result,Error};
use super::aggregate::{RegionDayRecord,per_capita};
use super::vaccine::VaccineRecord;


#[derive(Clone,Debug)]
pub struct RegionSummary {
    pub region: String,
    pub peak_cases: f64,
    pub peak_deaths: f64,
    pub peak_population: f64,
    pub cases_per_thousand: f64,
    pub deaths_per_thousand: f64,
    pub doses_per_thousand: Option<f64>,
    pub one_dose_per_thousand: Option<f64>,
    pub fully_vaccinated_per_thousand: Option<f64>,
    pub additional_doses_per_thousand: Option<f64>,
    pub predicted_deaths_per_thousand: Option<f64>,
    pub predicted_deaths_per_thousand_vaccine: Option<f64>,
}

pub const COLUMNS: &[&str] = &[
    "peak_cases",
    "peak_deaths",
    "peak_population",
    "cases_per_thousand",
    "deaths_per_thousand",
    "doses_per_thousand",
    "one_dose_per_thousand",
    "fully_vaccinated_per_thousand",
    "additional_doses_per_thousand",
    "predicted_deaths_per_thousand",
    "predicted_deaths_per_thousand_vaccine",
];

impl RegionSummary {

    pub fn column(&self, name: &str) -> Result<Option<f64>> {
	match name {
	    "peak_cases" => Ok(Some(self.peak_cases)),
	    "peak_deaths" => Ok(Some(self.peak_deaths)),
	    "peak_population" => Ok(Some(self.peak_population)),
	    "cases_per_thousand" => Ok(Some(self.cases_per_thousand)),
	    "deaths_per_thousand" => Ok(Some(self.deaths_per_thousand)),
	    "doses_per_thousand" => Ok(self.doses_per_thousand),
	    "one_dose_per_thousand" => Ok(self.one_dose_per_thousand),
	    "fully_vaccinated_per_thousand" => Ok(self.fully_vaccinated_per_thousand),
	    "additional_doses_per_thousand" => Ok(self.additional_doses_per_thousand),
	    "predicted_deaths_per_thousand" => Ok(self.predicted_deaths_per_thousand),
	    "predicted_deaths_per_thousand_vaccine" => Ok(self.predicted_deaths_per_thousand_vaccine),
	    _ => Err(Error::UnknownColumn(name.to_string())),
	}
    }

}

pub fn has_column(name: &str) -> bool {
    COLUMNS.contains(&name)
}


// Cumulative series can be revised downward; the maximum then wins over
// the latest value.
pub fn summarize(records: &[RegionDayRecord]) -> Result<Vec<RegionSummary>> {

    let mut peaks: BTreeMap<String,(f64,f64,f64)> = BTreeMap::new();

    for record in records {
	let entry = peaks.entry(record.region.clone()).or_insert((0.0, 0.0, 0.0));
	entry.0 = entry.0.max(record.cases);
	entry.1 = entry.1.max(record.deaths);
	entry.2 = entry.2.max(record.population);
    }

    peaks.into_iter()
	.filter(|(_,(cases,_,population))| *cases > 0.0 && *population > 0.0)
	.map(|(region,(peak_cases,peak_deaths,peak_population))| Ok(RegionSummary {
	    cases_per_thousand: per_capita(peak_cases, peak_population, 1000.0, &region)?,
	    deaths_per_thousand: per_capita(peak_deaths, peak_population, 1000.0, &region)?,
	    region,
	    peak_cases,
	    peak_deaths,
	    peak_population,
	    doses_per_thousand: None,
	    one_dose_per_thousand: None,
	    fully_vaccinated_per_thousand: None,
	    additional_doses_per_thousand: None,
	    predicted_deaths_per_thousand: None,
	    predicted_deaths_per_thousand_vaccine: None,
	}))
	.collect()

}


// Left join by exact region name; a spelling difference between the two
// datasets leaves the vaccine columns absent for that region.
pub fn merge_vaccinations(summaries: &mut [RegionSummary], records: &[VaccineRecord]) -> Result<()> {

    let mut latest: BTreeMap<&str,(Option<f64>,Option<f64>,Option<f64>,Option<f64>)> = BTreeMap::new();

    for record in records {
	let entry = latest.entry(record.region.as_str()).or_insert((None, None, None, None));
	entry.0 = max_count(entry.0, record.doses_admin);
	entry.1 = max_count(entry.1, record.people_one_dose);
	entry.2 = max_count(entry.2, record.people_fully_vaccinated);
	entry.3 = max_count(entry.3, record.additional_doses);
    }

    for summary in summaries.iter_mut() {
	if let Some((doses,one_dose,fully,additional)) = latest.get(summary.region.as_str()) {
	    summary.doses_per_thousand = rate(*doses, summary)?;
	    summary.one_dose_per_thousand = rate(*one_dose, summary)?;
	    summary.fully_vaccinated_per_thousand = rate(*fully, summary)?;
	    summary.additional_doses_per_thousand = rate(*additional, summary)?;
	}
    }

    Ok(())

}


fn max_count(current: Option<f64>, value: Option<f64>) -> Option<f64> {
    match (current, value) {
	(Some(a), Some(b)) => Some(a.max(b)),
	(Some(a), None) => Some(a),
	(None, b) => b,
    }
}


fn rate(value: Option<f64>, summary: &RegionSummary) -> Result<Option<f64>> {
    match value {
	Some(value) => Ok(Some(per_capita(value, summary.peak_population, 1000.0, &summary.region)?)),
	None => Ok(None),
    }
}
