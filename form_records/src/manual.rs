/*!

This is the long-form manual for `form_records` and `formrec`.

## Files

### `votes.csv`

```text
voter_id,candidate
0042,Jane
1234,John
```

One line per accepted vote. `voter_id` is exactly four digits, leading zeros
included. `candidate` is the canonical name of the candidate, as configured.
A voter ID appears at most once: the file is scanned before every append.

### `grades.csv`

```text
student_name,attempts,score1,score2,score3,score4,highest_score
Ana,2,55,80,0,0,80
"Doe, Jane",1,72.5,0,0,0,72.5
```

One line per submission; a student may appear several times. The four score
columns are always written. The scores of attempts not taken are `0`, and so
are blank scores. `highest_score` only considers the attempts taken.
Whole numbers are written without a decimal part.

Both files are created with their header the first time a form is opened.
An existing empty file receives the header at that point.
If the file cannot be created (missing directory, no permission), the form
reports it and refuses every submission.

## Validation rules

| Field         | Rule                                                  |
|---------------|-------------------------------------------------------|
| voter ID      | exactly 4 characters, all of them digits              |
| candidate     | one of the candidates, by name or code (any case)     |
| student name  | not blank                                             |
| attempts      | an integer between 1 and 4                            |
| score         | blank (counts as 0) or a number between 0 and 100     |

Checks run in the order of the table and stop at the first failure. Nothing
is written for a refused submission.

While the attempts field is being typed, the number of score inputs shown
is the typed integer clamped to [0, 4]. This is only a display hint: the
submission checks the attempts again with the strict rule above.

## Configuration

`formrec` reads an optional JSON file given with `--config`:

```json
{
  "votesFile": "votes.csv",
  "gradesFile": "grades.csv",
  "candidates": [
    { "name": "Jane", "code": "JD" },
    { "name": "John", "code": "JS" }
  ]
}
```

All keys are optional. Relative paths are resolved against the directory of
the configuration file. `--data-dir` and `--candidates` override the file.

## Concurrency

The duplicate check and the append are two separate file operations. Two
processes voting into the same file at the same time may both accept the
same voter ID. Run a single instance per file.

*/
