use chrono::naive::NaiveDate;

use super::error::{Result,Error};


pub struct WideSchema {
    pub uid: &'static str,
    pub admin2: &'static str,
    pub region: &'static str,
    pub country: &'static str,
    pub combined_key: &'static str,
    pub lat: &'static str,
    pub long: &'static str,
    pub population: Option<&'static str>,
    pub ignored: &'static [&'static str],
}

#[derive(Clone,Debug)]
pub struct Identity {
    pub uid: u64,
    pub admin2: Option<String>,
    pub region: String,
    pub country: String,
    pub combined_key: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Clone,Debug)]
pub struct LongRow {
    pub identity: Identity,
    pub population: Option<f64>,
    pub date: NaiveDate,
    pub value: f64,
}


// Every header the schema does not claim must parse as a date; one bad
// header aborts the whole reshape.
pub fn reshape(text: &str, schema: &WideSchema) -> Result<Vec<LongRow>> {

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let uid = index_of(&headers, schema.uid)?;
    let admin2 = index_of(&headers, schema.admin2)?;
    let region = index_of(&headers, schema.region)?;
    let country = index_of(&headers, schema.country)?;
    let combined_key = index_of(&headers, schema.combined_key)?;
    let lat = index_of(&headers, schema.lat)?;
    let long = index_of(&headers, schema.long)?;
    let population = match schema.population {
	Some(name) => Some(index_of(&headers, name)?),
	None => None,
    };

    let mut is_identity = vec![false; headers.len()];
    for i in [uid, admin2, region, country, combined_key, lat, long].iter() {
	is_identity[*i] = true;
    }
    if let Some(i) = population {
	is_identity[i] = true;
    }
    for name in schema.ignored {
	if let Some(i) = headers.iter().position(|h| h == *name) {
	    is_identity[i] = true;
	}
    }

    let mut date_columns = Vec::new();
    for (i,header) in headers.iter().enumerate() {
	if !is_identity[i] {
	    date_columns.push((i, parse_date_header(header)?));
	}
    }

    let mut rows = Vec::new();
    for record in reader.into_records() {

	let record = record?;
	let identity = Identity {
	    uid: record.get(uid).unwrap_or("").parse()?,
	    admin2: optional_string(record.get(admin2).unwrap_or("")),
	    region: record.get(region).unwrap_or("").to_string(),
	    country: record.get(country).unwrap_or("").to_string(),
	    combined_key: record.get(combined_key).unwrap_or("").to_string(),
	    lat: optional_number(record.get(lat).unwrap_or(""))?,
	    long: optional_number(record.get(long).unwrap_or(""))?,
	};
	let population = match population {
	    Some(i) => optional_number(record.get(i).unwrap_or(""))?,
	    None => None,
	};

	for (i,date) in date_columns.iter() {
	    rows.push(LongRow {
		identity: identity.clone(),
		population,
		date: *date,
		value: record.get(*i).unwrap_or("").parse()?,
	    });
	}

    }

    Ok(rows)

}


fn parse_date_header(header: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(header, "%m/%d/%y")
	.or_else(|_| NaiveDate::parse_from_str(header, "%Y-%m-%d"))
	.map_err(|_| Error::DateHeader(header.to_string()))
}


fn index_of(headers: &csv::StringRecord, name: &'static str) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or(Error::MissingColumn(name))
}


fn optional_string(value: &str) -> Option<String> {
    match value.is_empty() {
	true => None,
	false => Some(value.to_string()),
    }
}


fn optional_number(value: &str) -> Result<Option<f64>> {
    match value.is_empty() {
	true => Ok(None),
	false => Ok(Some(value.parse()?)),
    }
}


#[cfg(test)]
mod tests {

    use std::collections::BTreeMap;
    use super::*;
    use super::super::csse::{CONFIRMED_SCHEMA,DEATHS_SCHEMA};

    const WIDE: &str = "\
UID,iso2,iso3,code3,FIPS,Admin2,Province_State,Country_Region,Lat,Long_,Combined_Key,3/1/21,3/2/21,3/3/21
84000001,US,USA,840,,Ada,Alpha,US,40.0,-74.0,\"Ada, Alpha, US\",10,20,30
84000002,US,USA,840,,Bell,Beta,US,35.0,-80.0,\"Bell, Beta, US\",100,150,300
";

    #[test]
    fn round_trip() {
	let rows = reshape(WIDE, &CONFIRMED_SCHEMA).unwrap();
	assert_eq!(rows.len(), 6);

	// pivot back to one row per entity and compare the matrices
	let mut wide: BTreeMap<u64,Vec<(NaiveDate,f64)>> = BTreeMap::new();
	for row in rows.iter() {
	    wide.entry(row.identity.uid).or_insert_with(Vec::new).push((row.date, row.value));
	}
	let dates: Vec<NaiveDate> = (1..4).map(|d| NaiveDate::from_ymd(2021, 3, d)).collect();
	assert_eq!(wide[&84000001], dates.iter().cloned().zip(vec![10.0, 20.0, 30.0]).collect::<Vec<_>>());
	assert_eq!(wide[&84000002], dates.iter().cloned().zip(vec![100.0, 150.0, 300.0]).collect::<Vec<_>>());
    }

    #[test]
    fn coordinates_survive_the_reshape() {
	let rows = reshape(WIDE, &CONFIRMED_SCHEMA).unwrap();
	assert_eq!(rows[0].identity.lat, Some(40.0));
	assert_eq!(rows[0].identity.long, Some(-74.0));
	assert_eq!(rows[0].identity.admin2.as_deref(), Some("Ada"));
	assert_eq!(rows[0].identity.combined_key, "Ada, Alpha, US");
    }

    #[test]
    fn population_column_is_read_when_declared() {
	let wide = "\
UID,iso2,iso3,code3,FIPS,Admin2,Province_State,Country_Region,Lat,Long_,Combined_Key,Population,3/1/21
84000001,US,USA,840,,Ada,Alpha,US,40.0,-74.0,\"Ada, Alpha, US\",1000,1
";
	let rows = reshape(wide, &DEATHS_SCHEMA).unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].population, Some(1000.0));
	assert_eq!(rows[0].value, 1.0);
    }

    #[test]
    fn bad_date_header_aborts() {
	let wide = WIDE.replace("3/2/21", "notadate");
	match reshape(&wide, &CONFIRMED_SCHEMA) {
	    Err(Error::DateHeader(header)) => assert_eq!(header, "notadate"),
	    other => panic!("expected DateHeader error, got {:?}", other.map(|r| r.len())),
	}
    }

    #[test]
    fn missing_identity_column_is_an_error() {
	let wide = WIDE.replace("Combined_Key", "Combined");
	match reshape(&wide, &CONFIRMED_SCHEMA) {
	    Err(Error::MissingColumn(name)) => assert_eq!(name, "Combined_Key"),
	    other => panic!("expected MissingColumn error, got {:?}", other.map(|r| r.len())),
	}
    }

    #[test]
    fn iso_date_headers_parse_too() {
	assert_eq!(parse_date_header("2021-03-01").unwrap(), NaiveDate::from_ymd(2021, 3, 1));
	assert_eq!(parse_date_header("3/1/21").unwrap(), NaiveDate::from_ymd(2021, 3, 1));
    }

}
