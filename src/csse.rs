use std::path::Path;

use super::error::Result;
use super::fetch;
use super::reshape::{reshape,LongRow,WideSchema};


const IGNORED: &[&str] = &["iso2", "iso3", "code3", "FIPS"];

pub const CONFIRMED_SCHEMA: WideSchema = WideSchema {
    uid: "UID",
    admin2: "Admin2",
    region: "Province_State",
    country: "Country_Region",
    combined_key: "Combined_Key",
    lat: "Lat",
    long: "Long_",
    population: None,
    ignored: IGNORED,
};

pub const DEATHS_SCHEMA: WideSchema = WideSchema {
    uid: "UID",
    admin2: "Admin2",
    region: "Province_State",
    country: "Country_Region",
    combined_key: "Combined_Key",
    lat: "Lat",
    long: "Long_",
    population: Some("Population"),
    ignored: IGNORED,
};


pub fn confirmed(cache_path: &Path) -> Result<Vec<LongRow>> {
    let text = fetch::fetch_cached(
	cache_path, "time_series_covid19_confirmed_US.csv",
	"https://raw.githubusercontent.com/CSSEGISandData/COVID-19\
	 /master/csse_covid_19_data/csse_covid_19_time_series\
	 /time_series_covid19_confirmed_US.csv")?;
    reshape(&text, &CONFIRMED_SCHEMA)
}


pub fn deaths(cache_path: &Path) -> Result<Vec<LongRow>> {
    let text = fetch::fetch_cached(
	cache_path, "time_series_covid19_deaths_US.csv",
	"https://raw.githubusercontent.com/CSSEGISandData/COVID-19\
	 /master/csse_covid_19_data/csse_covid_19_time_series\
	 /time_series_covid19_deaths_US.csv")?;
    reshape(&text, &DEATHS_SCHEMA)
}
