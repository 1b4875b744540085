#![allow(dead_code)]

use bytes::Bytes;
use optical_services::models::UploadedFile;
use rust_xlsxwriter::Workbook;

pub struct OpticalReadings {
    pub spotmeter_white: f64,
    pub white_values: (f64, f64),
    pub spotmeter_black: f64,
    pub black_values: (f64, f64),
}

/// Build an in-memory workbook in the shape the optical test bench emits:
/// per color, a spotmeter value row, a homogeneity value row (labeled with
/// the spaced variant spelling) and a trailing marker row, with the numeric
/// readings in columns 4 and 5.
pub fn report_workbook(readings: &OpticalReadings) -> Bytes {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "DUT optical report").unwrap();

    sheet.write_string(2, 0, "Spotmeter #005").unwrap();
    sheet.write_number(2, 4, readings.spotmeter_white).unwrap();
    sheet.write_string(3, 0, "White Homogeneity").unwrap();
    sheet.write_number(3, 4, readings.white_values.0).unwrap();
    sheet.write_number(3, 5, readings.white_values.1).unwrap();
    sheet.write_string(4, 0, "WhiteHomogeneity").unwrap();

    sheet.write_string(6, 0, "Spotmeter #005").unwrap();
    sheet.write_number(6, 4, readings.spotmeter_black).unwrap();
    sheet.write_string(7, 0, "Black Homogeneity").unwrap();
    sheet.write_number(7, 4, readings.black_values.0).unwrap();
    sheet.write_number(7, 5, readings.black_values.1).unwrap();
    sheet.write_string(8, 0, "BlackHomogeneity").unwrap();

    Bytes::from(workbook.save_to_buffer().unwrap())
}

pub fn default_readings() -> OpticalReadings {
    OpticalReadings {
        spotmeter_white: 100.0,
        white_values: (55.0, 60.0),
        spotmeter_black: 0.2,
        black_values: (5.0, 10.0),
    }
}

pub fn upload(name: &str, data: Bytes) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        data,
    }
}
