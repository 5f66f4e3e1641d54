//! Canonical description of the analytical relation, fed to the language
//! model so it grounds intents and SQL in real column names.

pub const SCHEMA_CONTEXT: &str = "\
Table: nyc_311
Columns:
- unique_key (INTEGER): unique identifier for each complaint
- created_date (DATETIME): when the complaint was created
- closed_date (DATETIME): when the complaint was resolved, if closed
- complaint_type (TEXT): category of complaint (e.g. 'Noise', 'Illegal Parking')
- agency (TEXT): handling agency (e.g. 'NYPD', 'DOT')
- borough (TEXT): 'MANHATTAN', 'BROOKLYN', 'QUEENS', 'BRONX', 'STATEN ISLAND'
- zip_clean (TEXT): standardized ZIP code
- status (TEXT): current status of the complaint
- days_to_close (INTEGER): days taken to close the complaint
- is_closed (BOOLEAN): whether the complaint is closed (1/0)
- has_coordinates (BOOLEAN): whether lat/lon are available (1/0)
- year_created (INTEGER): year the complaint was created
- month_created (INTEGER): month the complaint was created (1-12)
- response_category (TEXT): type of resolution taken
- resolution_speed (TEXT): speed bucket ('SAME_DAY', 'WITHIN_3_DAYS', ...)
- is_priority (BOOLEAN): priority flag (1/0)

Common query patterns:
- Top complaints: GROUP BY complaint_type ORDER BY COUNT(*) DESC
- Geographic analysis: GROUP BY borough or zip_clean
- Time analysis: use days_to_close, created_date
- Closure rates: AVG(is_closed) * 100";
