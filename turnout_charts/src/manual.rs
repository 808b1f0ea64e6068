/*!

This is the long-form manual for `turnout_charts` and `turnoutviz`.

## Input formats

The voter file has one row per registered voter and per general election.
The following formats are supported:
* `csv` Comma Separated Values, optionally compressed with gzip (the file name must end with `.gz`)
* `xlsx` Excel workbook. The first worksheet is read unless a worksheet name is provided.

The first row contains the column names. The only required column is `year`.
The other columns are optional, but a chart fails if it needs a column that is not in the file.

| column              | content                                                   |
|---------------------|-----------------------------------------------------------|
| `year`              | election year (2012, 2016, 2020)                          |
| `vote_method_4`     | Early, No Vote, Election Day, Other                       |
| `vote_method_5`     | Early, No Vote, Election Day, Mail, Other                 |
| `vote_bin`          | Y, N                                                      |
| `pri_vote_bin`      | Y, N (voted in the primary)                               |
| `birth_age_adj`     | age at the time of the election                           |
| `gen_grp`           | GenZ, Millennial, GenX, Boomer, Greatest-Silent           |
| `party_grp`         | Dem, Rep, Other                                           |
| `gender_code`       | F, M, U                                                   |
| `race_grp`          | White, Black, Undesig., Other                             |
| `birth_reg_other`   | South, Missing, Northeast, Midwest, Other, West           |
| `drivers_lic`       | Y, N                                                      |
| `city_grp`          | Monroe, Waxhaw, Indian Trail, Matthews, Other             |
| `voter_status_desc` | Active, Inactive, Temp                                    |
| `registr_dt`        | registration date, as `YYYY-MM-DD`                        |

Other columns are ignored, except for the raw columns `birth_year`, `birth_state`,
`party_cd`, `race_code` and `res_city_desc`. When a grouped column is missing
but its raw column is present, the grouped values are computed while loading
(see the `derive` module). `drivers_lic` also accepts `License` / `No License`,
and `voter_status_desc` accepts the upper case labels of the state files.

Values that are not listed above are still counted and drawn, after the listed
values and without an assigned color. `turnoutviz` reports them as a warning,
or as an error with `--strict-categories`.

## Charts

| kind             | arguments                                               |
|------------------|---------------------------------------------------------|
| `basic_hist`     | `year`, `field`                                         |
| `grp_hist`       | `year`, `field`, `secondField`, `normalization`, `barMode` |
| `stack_grp_hist` | `year`, `field`, `secondField`, `normalization`         |
| `grp_yr_hist`    | `field`, `normalization`, `barMode`                     |
| `multi_yr_hist`  | `field`, `secondField`, `normalization`, `barMode`      |
| `basic_pie`      | `year`, `field`                                         |
| `grp_pie`        | `year`, `field`, `secondField`, `category`              |
| `multi_grp_pie`  | `field`, `secondField`, `category`                      |

`normalization` is `count` (default) or `percent`. In percent mode, the bars of
one color add up to 100 (for `stack_grp_hist`, the segments of one bar add up to 100).
`barMode` is one of `group` (default), `stack`, `overlay`, `relative`.

When `birth_age_adj` is used for colors or pie slices, the chart uses `gen_grp` instead.

A voting field (`vote_method_4`, `vote_method_5`, `vote_bin`) can only be broken
down by a field that describes the voter: `pri_vote_bin`, `gen_grp`, `party_grp`,
`gender_code`, `race_grp`, `birth_reg_other`, `drivers_lic`, `city_grp`.
For pies, the pair is read in the order of the menu: `secondField` is the field
picked first, and `category` is one value of `field`.

## Configuration

`turnoutviz` takes a configuration file in JSON. All the paths are relative to the
configuration file.

```text
{
  "outputSettings": {
    "title": "Union County turnout",
    "outputFile": "charts.json"
  },
  "dataSource": {
    "provider": "csv",
    "filePath": "gen_elecs.csv.gz"
  },
  "cacheSize": 64,
  "strictCategories": false,
  "charts": [
    { "kind": "basic_hist", "year": 2020, "field": "vote_method_4" },
    { "kind": "grp_hist", "year": 2016, "field": "vote_method_4",
      "secondField": "party_grp", "normalization": "percent" }
  ]
}
```

Command line flags override the configuration file. A single chart can also be
described with flags only, without a configuration file.

 */
