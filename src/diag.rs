//! The SHIPS diagnostic parameters kept in the archive, and how to interpret their raw values.

use crate::errors::ShipsDataErr;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Missing value marker in the raw text files.
pub const MISSING: i32 = 9999;

/// How a raw, stored value is turned into a value in the output units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Conversion {
    /// Multiply the raw value by a constant factor.
    Scale(f64),
}

impl Conversion {
    /// Apply the conversion.
    pub fn apply(self, raw: f64) -> f64 {
        match self {
            Conversion::Scale(factor) => raw * factor,
        }
    }
}

/// Static description of a diagnostic parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterDescriptor {
    /// Human readable description.
    pub description: &'static str,
    /// Units of the value as stored in the raw file and the archive.
    pub raw_units: &'static str,
    /// Units after conversion and the conversion, if the value is converted on retrieval.
    pub converted: Option<(&'static str, Conversion)>,
}

impl ParameterDescriptor {
    /// Units of the values handed out by the archive.
    pub fn units(&self) -> &'static str {
        self.converted
            .map(|(units, _)| units)
            .unwrap_or(self.raw_units)
    }

    /// Convert a raw value into output units. The missing value marker is never converted.
    pub fn convert(&self, raw: i64) -> Option<f64> {
        if raw == i64::from(MISSING) {
            return None;
        }

        let raw = raw as f64;
        Some(match self.converted {
            Some((_, conversion)) => conversion.apply(raw),
            None => raw,
        })
    }
}

// Struct literals so every descriptor is promoted to a 'static.
macro_rules! raw {
    ($description:expr, $raw_units:expr $(,)?) => {
        &ParameterDescriptor {
            description: $description,
            raw_units: $raw_units,
            converted: None,
        }
    };
}

macro_rules! tenths {
    ($description:expr, $raw_units:expr, $units:expr $(,)?) => {
        &ParameterDescriptor {
            description: $description,
            raw_units: $raw_units,
            converted: Some(($units, Conversion::Scale(0.1))),
        }
    };
}

/// Diagnostic parameters kept in the archive.
///
/// The declaration order is the column order of the diagnostics table. The array valued
/// parameters (IR00, IRM1, IRM3, IRXX, PC00, PCM1, PCM3, MTPW, PW01-PW21, PSLV) are not listed
/// and are skipped while parsing.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, EnumString, AsRefStr, IntoStaticStr, EnumIter,
)]
#[allow(missing_docs)]
pub enum Diag {
    VMAX,
    MSLP,
    TYPE,
    HIST,
    DELV,
    INCV,
    LAT,
    LON,
    CSST,
    CD20,
    CD26,
    COHC,
    DTL,
    OAGE,
    NAGE,
    RSST,
    VVAV,
    VMFX,
    VVAC,
    RHLO,
    RHMD,
    RHHI,
    Z850,
    D200,
    REFC,
    PEFC,
    T000,
    R000,
    Z000,
    TLAT,
    TLON,
    TWAC,
    TWXC,
    G150,
    G200,
    G250,
    V000,
    V850,
    V500,
    V300,
    TGRD,
    TADV,
    PENC,
    SHDC,
    SDDC,
    SHGC,
    DIVC,
    T150,
    T200,
    T250,
    SHRD,
    SHTD,
    SHRS,
    SHTS,
    SHRG,
    PENV,
    VMPI,
    EPOS,
    ENEG,
    EPSS,
    ENSS,
    RHCN,
    U200,
    U20C,
    V20C,
    E000,
    HE07,
    HE05,
    O500,
    O700,
    CFLX,
    XDST,
    XNST,
    XOHC,
    XDFR,
    XTMX,
    XDTX,
    XDML,
    XD30,
    XD28,
    XD26,
    XD24,
    XD22,
    XD20,
    XD18,
    XD16,
    XTFR,
    XO20,
    NSST,
    NSTA,
    NTMX,
    NDTX,
    NDML,
    ND30,
    ND28,
    ND26,
    ND24,
    ND22,
    ND20,
    ND18,
    ND16,
    NDFR,
    NTFR,
    NOHC,
    NO20,
    DSST,
    DSTA,
}

impl std::fmt::Display for Diag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Diag {
    /// The parameter code used in the raw files and as the column name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Look up a parameter code, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, ShipsDataErr> {
        Diag::from_str(&name.trim().to_uppercase())
            .map_err(|_| ShipsDataErr::UnknownParameter(name.to_owned()))
    }

    /// Description, units, and conversion for this parameter.
    pub fn descriptor(self) -> &'static ParameterDescriptor {
        use Diag::*;

        const DEG_C_10: &str = "deg C * 10";
        const KT_10: &str = "kt * 10";
        const MS_10: &str = "m/s * 10";
        const MS_100: &str = "m/s * 100";
        const PER_SEC_E7: &str = "1/s * 10^7";

        match self {
            VMAX => raw!("Maximum surface wind", "kt"),
            MSLP => raw!("Minimum sea level pressure", "hPa"),
            TYPE => raw!(
                "Storm type (0 wave/remnant/dissipating, 1 tropical, 2 subtropical, 3 extra-tropical)",
                "code",
            ),
            HIST => raw!(
                "Storm history, 6 h periods with winds of at least 20 kt in the area",
                "count",
            ),
            DELV => raw!("Intensity change since the initial time", "kt"),
            INCV => raw!("Intensity change over the previous 6 h", "kt"),
            LAT => tenths!("Storm latitude", "deg N * 10", "deg N"),
            LON => tenths!("Storm longitude", "deg W * 10", "deg W"),
            CSST => tenths!("Climatological sea surface temperature", DEG_C_10, "deg C"),
            CD20 => raw!("Climatological depth of the 20 deg C isotherm", "m"),
            CD26 => raw!("Climatological depth of the 26 deg C isotherm", "m"),
            COHC => raw!("Climatological ocean heat content", "kJ/cm^2"),
            DTL => raw!("Distance to nearest major land mass", "km"),
            OAGE => raw!(
                "Ocean age, time the area within 100 km of the center has been occupied",
                "h * 10",
            ),
            NAGE => raw!("Intensity weighted ocean age", "h * 10"),
            RSST => tenths!("Reynolds sea surface temperature", DEG_C_10, "deg C"),
            VVAV => raw!("Average vertical velocity of a lifted parcel, 0-15 km", MS_100),
            VMFX => raw!("VVAV weighted by the mass flux", MS_100),
            VVAC => raw!("VVAV with the vortex removed", MS_100),
            RHLO => raw!("850-700 hPa relative humidity, r=200-800 km", "%"),
            RHMD => raw!("700-500 hPa relative humidity, r=200-800 km", "%"),
            RHHI => raw!("500-300 hPa relative humidity, r=200-800 km", "%"),
            Z850 => raw!("850 hPa vorticity, r=0-1000 km", PER_SEC_E7),
            D200 => raw!("200 hPa divergence, r=0-1000 km", PER_SEC_E7),
            REFC => raw!("Relative eddy momentum flux convergence, 100-600 km", "m/s/day"),
            PEFC => raw!("Planetary eddy momentum flux convergence, 100-600 km", "m/s/day"),
            T000 => raw!("1000 hPa temperature, r=200-800 km", DEG_C_10),
            R000 => raw!("1000 hPa relative humidity, r=200-800 km", "%"),
            Z000 => raw!("1000 hPa height deviation from the standard atmosphere", "m"),
            TLAT => raw!("Latitude of the 850 hPa vortex center", "deg N * 10"),
            TLON => raw!("Longitude of the 850 hPa vortex center", "deg W * 10"),
            TWAC => raw!("Average 850 hPa symmetric tangential wind, r=0-600 km", MS_10),
            TWXC => raw!("Maximum 850 hPa symmetric tangential wind", MS_10),
            G150 => raw!("150 hPa warm core temperature perturbation", DEG_C_10),
            G200 => raw!("200 hPa warm core temperature perturbation", DEG_C_10),
            G250 => raw!("250 hPa warm core temperature perturbation", DEG_C_10),
            V000 => raw!("1000 hPa tangential wind, r=0-500 km", MS_10),
            V850 => raw!("850 hPa tangential wind, r=0-500 km", MS_10),
            V500 => raw!("500 hPa tangential wind, r=0-500 km", MS_10),
            V300 => raw!("300 hPa tangential wind, r=0-500 km", MS_10),
            TGRD => raw!("850-700 hPa temperature gradient magnitude", "deg C/m * 10^7"),
            TADV => raw!("850-700 hPa temperature advection", "deg C/s * 10^6"),
            PENC => raw!("Surface pressure at the outer vortex edge", "(hPa - 1000) * 10"),
            SHDC => raw!("850-200 hPa shear with the vortex removed, r=0-500 km", KT_10),
            SDDC => raw!("Heading of the SHDC shear vector", "deg"),
            SHGC => raw!("Generalized 850-200 hPa shear with the vortex removed", KT_10),
            DIVC => raw!("200 hPa divergence centered on the vortex, r=0-1000 km", PER_SEC_E7),
            T150 => tenths!("150 hPa temperature, r=200-800 km", DEG_C_10, "deg C"),
            T200 => tenths!("200 hPa temperature, r=200-800 km", DEG_C_10, "deg C"),
            T250 => tenths!("250 hPa temperature, r=200-800 km", DEG_C_10, "deg C"),
            SHRD => tenths!("850-200 hPa shear magnitude, r=200-800 km", KT_10, "kt"),
            SHTD => raw!("Heading of the SHRD shear vector", "deg"),
            SHRS => tenths!("850-500 hPa shear magnitude, r=200-800 km", KT_10, "kt"),
            SHTS => raw!("Heading of the SHRS shear vector", "deg"),
            SHRG => raw!("Generalized 850-200 hPa shear magnitude", KT_10),
            PENV => raw!("Average surface pressure, r=200-800 km", "(hPa - 1000) * 10"),
            VMPI => raw!("Maximum potential intensity", "kt"),
            EPOS => raw!("Positive theta-e difference, parcel minus environment", DEG_C_10),
            ENEG => raw!("Negative theta-e difference, parcel minus environment", DEG_C_10),
            EPSS => raw!("Positive theta-e difference, parcel minus saturated env.", DEG_C_10),
            ENSS => raw!("Negative theta-e difference, parcel minus saturated env.", DEG_C_10),
            RHCN => raw!("700-500 hPa relative humidity, r=200-800 km, ice adjusted", "%"),
            U200 => tenths!("200 hPa zonal wind, r=200-800 km", KT_10, "kt"),
            U20C => raw!("200 hPa zonal wind, r=0-500 km", KT_10),
            V20C => raw!("200 hPa meridional wind, r=0-500 km", KT_10),
            E000 => raw!("1000 hPa theta-e, r=200-800 km", "K * 10"),
            HE07 => raw!("1000-700 hPa storm relative helicity", "m^2/s^2"),
            HE05 => raw!("1000-500 hPa storm relative helicity", "m^2/s^2"),
            O500 => raw!("500 hPa pressure vertical velocity", "hPa/day"),
            O700 => raw!("700 hPa pressure vertical velocity", "hPa/day"),
            CFLX => raw!("Dry air predictor, ocean moisture flux", "dimensionless"),
            XDST => tenths!("Reynolds SST along the track, ocean analysis", DEG_C_10, "deg C"),
            XNST => raw!("NCODA SST along the track, ocean analysis", DEG_C_10),
            XOHC => raw!("Ocean heat content, ocean analysis", "kJ/cm^2"),
            XDFR => raw!("Depth of the deepest profile level, ocean analysis", "m"),
            XTMX => raw!("Maximum profile temperature, ocean analysis", DEG_C_10),
            XDTX => raw!("Depth of the maximum temperature, ocean analysis", "m"),
            XDML => raw!("Mixed layer depth, ocean analysis", "m"),
            XD30 => raw!("Depth of the 30 deg C isotherm, ocean analysis", "m"),
            XD28 => raw!("Depth of the 28 deg C isotherm, ocean analysis", "m"),
            XD26 => raw!("Depth of the 26 deg C isotherm, ocean analysis", "m"),
            XD24 => raw!("Depth of the 24 deg C isotherm, ocean analysis", "m"),
            XD22 => raw!("Depth of the 22 deg C isotherm, ocean analysis", "m"),
            XD20 => raw!("Depth of the 20 deg C isotherm, ocean analysis", "m"),
            XD18 => raw!("Depth of the 18 deg C isotherm, ocean analysis", "m"),
            XD16 => raw!("Depth of the 16 deg C isotherm, ocean analysis", "m"),
            XTFR => raw!("Temperature at the deepest profile level, ocean analysis", DEG_C_10),
            XO20 => raw!("Ocean heat content relative to 20 deg C, ocean analysis", "kJ/cm^2"),
            NSST => tenths!("Sea surface temperature, NCODA analysis", DEG_C_10, "deg C"),
            NSTA => raw!("Sea surface temperature anomaly, NCODA analysis", DEG_C_10),
            NTMX => raw!("Maximum profile temperature, NCODA analysis", DEG_C_10),
            NDTX => raw!("Depth of the maximum temperature, NCODA analysis", "m"),
            NDML => raw!("Mixed layer depth, NCODA analysis", "m"),
            ND30 => raw!("Depth of the 30 deg C isotherm, NCODA analysis", "m"),
            ND28 => raw!("Depth of the 28 deg C isotherm, NCODA analysis", "m"),
            ND26 => raw!("Depth of the 26 deg C isotherm, NCODA analysis", "m"),
            ND24 => raw!("Depth of the 24 deg C isotherm, NCODA analysis", "m"),
            ND22 => raw!("Depth of the 22 deg C isotherm, NCODA analysis", "m"),
            ND20 => raw!("Depth of the 20 deg C isotherm, NCODA analysis", "m"),
            ND18 => raw!("Depth of the 18 deg C isotherm, NCODA analysis", "m"),
            ND16 => raw!("Depth of the 16 deg C isotherm, NCODA analysis", "m"),
            NDFR => raw!("Depth of the deepest profile level, NCODA analysis", "m"),
            NTFR => raw!("Temperature at the deepest profile level, NCODA analysis", DEG_C_10),
            NOHC => raw!("Ocean heat content, NCODA analysis", "kJ/cm^2"),
            NO20 => raw!("Ocean heat content relative to 20 deg C, NCODA analysis", "kJ/cm^2"),
            DSST => tenths!("Daily Reynolds sea surface temperature", DEG_C_10, "deg C"),
            DSTA => tenths!("Daily Reynolds SST, average over r=0-50 km", DEG_C_10, "deg C"),
        }
    }
}

/// Names of all the diagnostic parameters in the archive, in column order.
pub fn get_diag_names() -> Vec<&'static str> {
    Diag::iter().map(Diag::name).collect()
}

/// Check a list of requested parameter names against the known parameters.
pub fn validate_diag_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<Diag>, ShipsDataErr> {
    names.iter().map(|nm| Diag::from_name(nm.as_ref())).collect()
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
