use common::{RegionSeries, YearValue, FIRST_YEAR, LAST_YEAR};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use tracing::warn;

/// One row of the hosted poverty table: a region id and its yearly counts
/// (thousands of people). The province totals live in the row `jawa timur`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "jumlah_penduduk_miskin")]
pub struct Model {
    /// Lower-case region name.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "2007")]
    pub y2007: Option<f64>,
    #[sea_orm(column_name = "2008")]
    pub y2008: Option<f64>,
    #[sea_orm(column_name = "2009")]
    pub y2009: Option<f64>,
    #[sea_orm(column_name = "2010")]
    pub y2010: Option<f64>,
    #[sea_orm(column_name = "2011")]
    pub y2011: Option<f64>,
    #[sea_orm(column_name = "2012")]
    pub y2012: Option<f64>,
    #[sea_orm(column_name = "2013")]
    pub y2013: Option<f64>,
    #[sea_orm(column_name = "2014")]
    pub y2014: Option<f64>,
    #[sea_orm(column_name = "2015")]
    pub y2015: Option<f64>,
    #[sea_orm(column_name = "2016")]
    pub y2016: Option<f64>,
    #[sea_orm(column_name = "2017")]
    pub y2017: Option<f64>,
    #[sea_orm(column_name = "2018")]
    pub y2018: Option<f64>,
    #[sea_orm(column_name = "2019")]
    pub y2019: Option<f64>,
    #[sea_orm(column_name = "2020")]
    pub y2020: Option<f64>,
    #[sea_orm(column_name = "2021")]
    pub y2021: Option<f64>,
    #[sea_orm(column_name = "2022")]
    pub y2022: Option<f64>,
    #[sea_orm(column_name = "2023")]
    pub y2023: Option<f64>,
    #[sea_orm(column_name = "2024")]
    pub y2024: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A row with every year empty.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            y2007: None,
            y2008: None,
            y2009: None,
            y2010: None,
            y2011: None,
            y2012: None,
            y2013: None,
            y2014: None,
            y2015: None,
            y2016: None,
            y2017: None,
            y2018: None,
            y2019: None,
            y2020: None,
            y2021: None,
            y2022: None,
            y2023: None,
            y2024: None,
        }
    }

    /// Every year column paired with its cell.
    pub fn cells(&self) -> [(i32, Option<f64>); 18] {
        [
            (2007, self.y2007),
            (2008, self.y2008),
            (2009, self.y2009),
            (2010, self.y2010),
            (2011, self.y2011),
            (2012, self.y2012),
            (2013, self.y2013),
            (2014, self.y2014),
            (2015, self.y2015),
            (2016, self.y2016),
            (2017, self.y2017),
            (2018, self.y2018),
            (2019, self.y2019),
            (2020, self.y2020),
            (2021, self.y2021),
            (2022, self.y2022),
            (2023, self.y2023),
            (2024, self.y2024),
        ]
    }

    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.cells()
            .into_iter()
            .find(|(y, _)| *y == year)
            .and_then(|(_, value)| value)
    }

    /// Long form of the row, skipping empty cells.
    pub fn series(&self) -> RegionSeries {
        let points = self
            .cells()
            .into_iter()
            .filter_map(|(year, value)| value.map(|v| YearValue::new(year, v)))
            .collect();
        RegionSeries::new(self.id.clone(), points)
    }

    /// Wide row from a series. Years outside the table's columns are dropped.
    pub fn from_series(series: &RegionSeries) -> Self {
        let mut model = Self::empty(series.region.clone());
        for point in &series.points {
            match model.slot_mut(point.year) {
                Some(slot) => *slot = Some(point.value),
                None => warn!(
                    region = %series.region,
                    year = point.year,
                    "Year outside {}..={} has no column, skipping",
                    FIRST_YEAR,
                    LAST_YEAR
                ),
            }
        }
        model
    }

    /// Active model with every column set, ready for insert or upsert.
    pub fn to_active_model(&self) -> ActiveModel {
        ActiveModel {
            id: Set(self.id.clone()),
            y2007: Set(self.y2007),
            y2008: Set(self.y2008),
            y2009: Set(self.y2009),
            y2010: Set(self.y2010),
            y2011: Set(self.y2011),
            y2012: Set(self.y2012),
            y2013: Set(self.y2013),
            y2014: Set(self.y2014),
            y2015: Set(self.y2015),
            y2016: Set(self.y2016),
            y2017: Set(self.y2017),
            y2018: Set(self.y2018),
            y2019: Set(self.y2019),
            y2020: Set(self.y2020),
            y2021: Set(self.y2021),
            y2022: Set(self.y2022),
            y2023: Set(self.y2023),
            y2024: Set(self.y2024),
        }
    }

    fn slot_mut(&mut self, year: i32) -> Option<&mut Option<f64>> {
        match year {
            2007 => Some(&mut self.y2007),
            2008 => Some(&mut self.y2008),
            2009 => Some(&mut self.y2009),
            2010 => Some(&mut self.y2010),
            2011 => Some(&mut self.y2011),
            2012 => Some(&mut self.y2012),
            2013 => Some(&mut self.y2013),
            2014 => Some(&mut self.y2014),
            2015 => Some(&mut self.y2015),
            2016 => Some(&mut self.y2016),
            2017 => Some(&mut self.y2017),
            2018 => Some(&mut self.y2018),
            2019 => Some(&mut self.y2019),
            2020 => Some(&mut self.y2020),
            2021 => Some(&mut self.y2021),
            2022 => Some(&mut self.y2022),
            2023 => Some(&mut self.y2023),
            2024 => Some(&mut self.y2024),
            _ => None,
        }
    }
}

impl Column {
    /// Column holding the given year, if the table has one.
    pub fn for_year(year: i32) -> Option<Self> {
        match year {
            2007 => Some(Column::Y2007),
            2008 => Some(Column::Y2008),
            2009 => Some(Column::Y2009),
            2010 => Some(Column::Y2010),
            2011 => Some(Column::Y2011),
            2012 => Some(Column::Y2012),
            2013 => Some(Column::Y2013),
            2014 => Some(Column::Y2014),
            2015 => Some(Column::Y2015),
            2016 => Some(Column::Y2016),
            2017 => Some(Column::Y2017),
            2018 => Some(Column::Y2018),
            2019 => Some(Column::Y2019),
            2020 => Some(Column::Y2020),
            2021 => Some(Column::Y2021),
            2022 => Some(Column::Y2022),
            2023 => Some(Column::Y2023),
            2024 => Some(Column::Y2024),
            _ => None,
        }
    }

    /// All year columns in ascending order.
    pub fn years() -> Vec<Self> {
        (FIRST_YEAR..=LAST_YEAR).filter_map(Self::for_year).collect()
    }
}
